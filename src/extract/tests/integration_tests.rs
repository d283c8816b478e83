use crate::extract::extract;

/// A realistic assistant response: prose, tool chatter, two tagged code
/// blocks and an element inventory.
const RESPONSE: &str = r#"I navigated to the page and captured a snapshot. Based on the structure, here is the Page Object Model:

```typescript
import { Page, Locator } from '@playwright/test';

export class SearchPage {
    readonly page: Page;
    readonly searchInput: Locator;

    constructor(page: Page) {
        this.page = page;
        this.searchInput = page.locator('input[name="q"]');
    }

    async goto() {
        await this.page.goto('https://example.com');
    }
}
```

And a sample test:

```typescript
import { test, expect } from '@playwright/test';
import { SearchPage } from './search.page';

test('search works', async ({ page }) => {
    const searchPage = new SearchPage(page);
    await searchPage.goto();
});
```

Elements found:
- Search input (input[name="q"])
- Search button
- Logo link
"#;

#[test]
fn test_full_extraction() {
    let result = extract(RESPONSE);
    assert!(result.page_object_code.starts_with("import { Page, Locator }"));
    assert!(result.page_object_code.ends_with('}'));
    assert!(result.test_code.contains("from './search.page'"));
    assert_eq!(result.elements.len(), 3);
    assert_eq!(result.elements[1], "Search button");
    assert!(result.snapshot_data.is_none());
    assert!(!result.is_empty());
}

#[test]
fn test_extraction_is_deterministic() {
    let first = extract(RESPONSE);
    let second = extract(RESPONSE);
    assert_eq!(first, second);
}
