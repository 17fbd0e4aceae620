use super::model::ParsedSegment;
use super::tokens;

pub fn parse_format(format: &str) -> Vec<ParsedSegment> {
    let mut segments = Vec::<ParsedSegment>::new();
    let mut rest = format;

    while let Some(ch) = rest.chars().next() {
        if let Some(token) = tokens::match_prefix(rest) {
            segments.push(ParsedSegment::Token(token));
            rest = &rest[token.name.len()..];
            continue;
        }
        segments.push(ParsedSegment::Literal(ch));
        rest = &rest[ch.len_utf8()..];
    }

    tracing::trace!(format, segments = segments.len(), "parsed mask format");
    segments
}

pub fn segments_to_format(segments: &[ParsedSegment]) -> String {
    segments.iter().map(ParsedSegment::text).collect()
}
