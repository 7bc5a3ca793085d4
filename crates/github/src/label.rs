//! Key label extraction from raw webhook bodies

/// Picks the key label for a webhook delivery from its raw body.
///
/// Any `Fn(&[u8]) -> Option<String>` works as an extractor.
pub trait LabelExtractor: Send + Sync {
    fn extract(&self, body: &[u8]) -> Option<String>;
}

impl<F> LabelExtractor for F
where
    F: Fn(&[u8]) -> Option<String> + Send + Sync,
{
    fn extract(&self, body: &[u8]) -> Option<String> {
        self(body)
    }
}

/// Default extractor: the branch named by a push event's `ref` field
#[derive(Debug, Clone, Copy, Default)]
pub struct BranchLabel;

impl LabelExtractor for BranchLabel {
    fn extract(&self, body: &[u8]) -> Option<String> {
        parse_key_label_from_branch(body)
    }
}

const REF_FIELD: &[u8] = b"\"ref\":";
const HEADS_PREFIX: &[u8] = b"\"refs/heads/";

/// Find `"ref": "refs/heads/<name>"` in the body and return `<name>`.
///
/// This is a byte scan, not a JSON parse, so bodies that are not valid JSON
/// simply produce no label. At most one space may follow the colon.
pub fn parse_key_label_from_branch(body: &[u8]) -> Option<String> {
    let mut rest = body;
    while let Some(pos) = find(rest, REF_FIELD) {
        rest = &rest[pos + REF_FIELD.len()..];
        if let Some(branch) = branch_after_colon(rest) {
            return Some(branch);
        }
    }
    None
}

fn branch_after_colon(rest: &[u8]) -> Option<String> {
    let rest = rest.strip_prefix(b" ").unwrap_or(rest);
    let rest = rest.strip_prefix(HEADS_PREFIX)?;
    let end = rest.iter().position(|&b| b == b'"')?;
    if end == 0 {
        return None;
    }
    std::str::from_utf8(&rest[..end]).ok().map(str::to_string)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
