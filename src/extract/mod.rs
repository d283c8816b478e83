#[cfg(test)]
mod tests;

use regex::Regex;

/// Typed artifacts recovered from the assistant's free-text response
///
/// Derived deterministically from the concatenated response text. Empty
/// fields are a valid outcome (the assistant produced fewer artifacts than
/// asked for), not an error; callers check [`ExtractionResult::is_empty`]
/// and warn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionResult {
    /// First ```typescript block: the page-object class
    pub page_object_code: String,

    /// Second ```typescript block: the sample test file
    pub test_code: String,

    /// Bulleted element inventory, in source order, bullets stripped
    pub elements: Vec<String>,

    /// Structural page snapshot captured during streaming (best effort)
    pub snapshot_data: Option<String>,
}

impl ExtractionResult {
    /// True when neither code artifact was produced
    pub fn is_empty(&self) -> bool {
        self.page_object_code.is_empty() && self.test_code.is_empty()
    }
}

/// Extracts typed artifacts from the full response text.
///
/// Pure and deterministic: identical input yields a byte-identical result.
/// The first tagged code block is elected as the page object and the second
/// as the test; any further blocks are discarded. `snapshot_data` is left
/// unset here because it is a streaming-time heuristic, filled in by the
/// conversation driver.
pub fn extract(full_text: &str) -> ExtractionResult {
    let code_blocks = extract_code_blocks(full_text);
    let mut blocks = code_blocks.into_iter();

    ExtractionResult {
        page_object_code: blocks.next().unwrap_or_default(),
        test_code: blocks.next().unwrap_or_default(),
        elements: extract_elements(full_text),
        snapshot_data: None,
    }
}

/// Collects fenced ```typescript blocks in order of appearance, trimmed of
/// surrounding whitespace. Blocks with other (or no) language tags are
/// ignored.
pub fn extract_code_blocks(text: &str) -> Vec<String> {
    let re = Regex::new(r"(?s)```typescript\n(.*?)```").expect("code block pattern should be valid");
    re.captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .collect()
}

/// Extracts the element inventory from the response.
///
/// A small fixed set of heading/label patterns is tried in priority order;
/// the first one that matches wins and later patterns are never merged in.
/// Each matched line has its leading bullet marker (`-`, `*` or `•`) and
/// surrounding whitespace stripped.
pub fn extract_elements(text: &str) -> Vec<String> {
    let patterns = [
        r"(?i)(?:Elements found|Elements identified|Element list|Elements):\s*\n((?:[-*•]\s*.+\n?)+)",
        r"(?i)(?:### Elements|## Elements)\s*\n((?:[-*•]\s*.+\n?)+)",
        r"(?i)(?:\d+\.\s*.*?elements.*?)\n((?:[-*•]\s*.+\n?)+)",
    ];

    let bullet = Regex::new(r"^[-*•]\s*").expect("bullet pattern should be valid");

    for pattern in patterns {
        let re = Regex::new(pattern).expect("element pattern should be valid");
        if let Some(caps) = re.captures(text) {
            let block = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            return block
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(|line| bullet.replace(line, "").to_string())
                .collect();
        }
    }

    Vec::new()
}
