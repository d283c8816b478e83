use crate::config::GenerationConfig;
use crate::error::Error;
use crate::extract::ExtractionResult;
use regex::Regex;
use std::path::{Path, PathBuf};

/// What one generation run wrote to disk
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Root directory of the artifact set
    pub output_dir: PathBuf,

    /// Every file written, in write order
    pub written: Vec<PathBuf>,

    /// Whether the page-object artifact was produced
    pub page_object_written: bool,

    /// Whether the test artifact was produced
    pub test_written: bool,
}

impl RunReport {
    /// True when neither code artifact was written; the caller should warn
    pub fn is_code_missing(&self) -> bool {
        !self.page_object_written && !self.test_written
    }
}

/// Writes the extracted artifacts into the fixed directory layout.
///
/// Creates `<output_root>/<page>/{pages,tests}` as needed and writes each
/// artifact only when non-empty; a README is always written. Partial
/// artifact sets are reported through [`RunReport`], never raised as
/// errors. No cleanup is attempted on failure; earlier writes stay.
pub async fn materialize(
    config: &GenerationConfig,
    result: &ExtractionResult,
    output_root: &Path,
) -> Result<RunReport, Error> {
    let name = config.dir_name();
    let output_dir = output_root.join(&name);

    tokio::fs::create_dir_all(output_dir.join("pages")).await?;
    tokio::fs::create_dir_all(output_dir.join("tests")).await?;

    let mut report = RunReport {
        output_dir: output_dir.clone(),
        written: Vec::new(),
        page_object_written: false,
        test_written: false,
    };

    if !result.page_object_code.is_empty() {
        let path = output_dir.join("pages").join(format!("{name}.page.ts"));
        tokio::fs::write(&path, &result.page_object_code).await?;
        ::log::info!("Page object saved to: {}", path.display());
        report.written.push(path);
        report.page_object_written = true;
    } else {
        ::log::warn!("No page object code was generated");
    }

    if !result.test_code.is_empty() {
        let path = output_dir.join("tests").join(format!("{name}.spec.ts"));
        let test_code = rewrite_test_import(&result.test_code, &name);
        tokio::fs::write(&path, test_code).await?;
        ::log::info!("Test file saved to: {}", path.display());
        report.written.push(path);
        report.test_written = true;
    } else {
        ::log::warn!("No test code was generated");
    }

    if !result.elements.is_empty() {
        let path = output_dir.join("elements.md");
        tokio::fs::write(&path, render_elements(config, &result.elements)).await?;
        ::log::info!("Element list saved to: {}", path.display());
        report.written.push(path);
    }

    if let Some(snapshot) = &result.snapshot_data {
        let path = output_dir.join("snapshot.txt");
        tokio::fs::write(&path, snapshot).await?;
        ::log::info!("Page snapshot saved to: {}", path.display());
        report.written.push(path);
    }

    let readme_path = output_dir.join("README.md");
    tokio::fs::write(&readme_path, render_readme(config, &report)).await?;
    ::log::info!("README saved to: {}", readme_path.display());
    report.written.push(readme_path);

    Ok(report)
}

/// Rewrites the first relative import in the generated test so it points at
/// the sibling page-object file instead of whatever placeholder path the
/// assistant emitted
fn rewrite_test_import(test_code: &str, name: &str) -> String {
    let re = Regex::new(r#"from ['"]\.\.?/[^'"]+['"]"#).expect("import pattern should be valid");
    let replacement = format!("from '../pages/{name}.page'");
    // NoExpand: the page name must land verbatim, not as $-group syntax
    re.replace(test_code, regex::NoExpand(&replacement))
        .to_string()
}

/// Renders `elements.md`: a fixed heading plus the bulleted inventory
fn render_elements(config: &GenerationConfig, elements: &[String]) -> String {
    let list = elements
        .iter()
        .map(|e| format!("- {e}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "# Page Elements for {page_name}\n\n## Elements Found\n\n{list}\n\n## Notes\nThese elements were identified by visiting the page with browser automation.\n",
        page_name = config.page_name,
    )
}

/// Renders `README.md` summarizing the run and how to use its output
fn render_readme(config: &GenerationConfig, report: &RunReport) -> String {
    let name = config.dir_name();
    let class_name = config.class_name();

    let mut files = Vec::new();
    if report.page_object_written {
        files.push(format!(
            "- `pages/{name}.page.ts` - Page Object Model class"
        ));
    }
    if report.test_written {
        files.push(format!("- `tests/{name}.spec.ts` - Sample test file"));
    }
    for path in &report.written {
        match path.file_name().and_then(|f| f.to_str()) {
            Some("elements.md") => {
                files.push("- `elements.md` - List of identified page elements".to_string())
            }
            Some("snapshot.txt") => {
                files.push("- `snapshot.txt` - Raw page snapshot".to_string())
            }
            _ => {}
        }
    }
    let files = if files.is_empty() {
        "(no artifacts were generated)".to_string()
    } else {
        files.join("\n")
    };

    format!(
        r#"# {page_name} Page Object Model

## Description
{description}

## URL
{url}

## Generated Files
{files}

## Usage
```typescript
import {{ {class_name} }} from './pages/{name}.page';

test('example test', async ({{ page }}) => {{
    const {name}Page = new {class_name}(page);
    await {name}Page.goto();
    // Add your test steps here
}});
```

## Running Tests
```bash
npx playwright test tests/{name}.spec.ts
```
"#,
        page_name = config.page_name,
        description = config.description,
        url = config.url,
    )
}
