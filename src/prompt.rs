use crate::config::GenerationConfig;

/// Tool identifier for navigating the browser to a URL
pub const BROWSER_NAVIGATE: &str = "mcp__playwright__browser_navigate";

/// Tool identifier for capturing an accessibility snapshot of the page
pub const BROWSER_SNAPSHOT: &str = "mcp__playwright__browser_snapshot";

/// Tool identifier for closing the browser
pub const BROWSER_CLOSE: &str = "mcp__playwright__browser_close";

/// The automation tools the assistant is allowed to invoke, in the order the
/// prompt asks for them (navigate, snapshot, close)
pub fn default_allowed_tools() -> Vec<String> {
    vec![
        BROWSER_NAVIGATE.to_string(),
        BROWSER_SNAPSHOT.to_string(),
        BROWSER_CLOSE.to_string(),
    ]
}

/// Renders the instruction prompt for a generation run.
///
/// The template is fixed aside from field interpolation: it names the exact
/// automation tools to invoke and the expected output format (two labeled
/// ```typescript blocks plus a markdown element list), which is what the
/// response extractor later scans for.
pub fn build_prompt(config: &GenerationConfig) -> String {
    format!(
        r#"I need you to generate a Playwright Page Object Model by actually visiting and analyzing the page using the browser automation tools.

URL: {url}
Page Name: {page_name}
Description: {description}

Please follow these steps:

1. Use the {navigate} tool to navigate to {url}
2. Use the {snapshot} tool to capture the page structure
3. Analyze the snapshot to identify all interactive elements (buttons, inputs, links, dropdowns, etc.)
4. Close the browser with {close}

After analyzing the real page, generate:
1. A complete TypeScript Page Object Model class named {class_name} with element locators based on the actual page
2. A sample test file using the Page Object Model
3. A list of all elements found on the page

Format your final output with:
- Page Object Model code in a ```typescript code block
- Test file in another ```typescript code block
- Element list as a markdown list"#,
        url = config.url,
        page_name = config.page_name,
        description = config.description,
        class_name = config.class_name(),
        navigate = BROWSER_NAVIGATE,
        snapshot = BROWSER_SNAPSHOT,
        close = BROWSER_CLOSE,
    )
}
