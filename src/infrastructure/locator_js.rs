//! 定位器脚本生成
//!
//! 把 [`Locator`] 翻译成 XPath，在页面内求值后给命中的节点打上
//! `data-iol-ref` 标记，之后通过该标记寻址元素。

use crate::infrastructure::ui_surface::{Locator, ShareStrategy, TextMatch};

/// 元素引用属性名
pub const REF_ATTRIBUTE: &str = "data-iol-ref";

const CLICKABLE: &str = "*[self::button or self::a or @role='button']";

/// 生成 XPath 字面量（处理同时含单双引号的文本）
pub fn xpath_literal(text: &str) -> String {
    if !text.contains('\'') {
        format!("'{}'", text)
    } else if !text.contains('"') {
        format!("\"{}\"", text)
    } else {
        let parts: Vec<String> = text.split('\'').map(|p| format!("'{}'", p)).collect();
        format!("concat({})", parts.join(", \"'\", "))
    }
}

/// 定位器对应的 XPath（相对于作用域根节点）
pub fn locator_xpath(locator: &Locator) -> String {
    match locator {
        Locator::Button(TextMatch::Exact(text)) => {
            format!(".//button[normalize-space(.)={}]", xpath_literal(text))
        }
        Locator::Button(TextMatch::Contains(text)) => {
            format!(".//button[contains(normalize-space(.), {})]", xpath_literal(text))
        }
        Locator::NthCheckbox(n) => format!(
            "(.//input[@type='checkbox' and contains(@class, 'mud-checkbox-input')])[{}]",
            n
        ),
        Locator::Label(text) => format!(".//label[normalize-space(.)={}]", xpath_literal(text)),
        Locator::Id(id) => format!(".//*[@id={}]", xpath_literal(id)),
        Locator::SectionByHeading(heading) => format!(
            ".//h5[contains(normalize-space(.), {})]/ancestor::div[contains(@class, 'mud-paper')][1]",
            xpath_literal(heading)
        ),
        Locator::TextInputs => {
            ".//input[not(@type='checkbox') and not(@type='radio') and not(@type='hidden')]"
                .to_string()
        }
        Locator::LabelFor(id) => format!(".//label[@for={}]", xpath_literal(id)),
        Locator::SelectTrigger(None) => ".//div[contains(@class, 'mud-select')]".to_string(),
        Locator::SelectTrigger(Some(label)) => format!(
            ".//div[contains(@class, 'mud-select') and .//label[normalize-space(.)={}]]",
            xpath_literal(label)
        ),
        Locator::OpenPopover => "//div[contains(@class, 'mud-popover-open')]".to_string(),
        Locator::ListItem(text) => format!(
            ".//div[contains(@class, 'mud-list-item')][.//p[normalize-space(.)={}]]",
            xpath_literal(text)
        ),
        Locator::ListItems => ".//div[contains(@class, 'mud-list-item')]".to_string(),
        Locator::Switch(label) => {
            let label = xpath_literal(label);
            format!(
                ".//label[contains(@class, 'mud-switch')][normalize-space(.)={label}]//input[@type='checkbox'] \
                 | .//input[@type='checkbox'][@id = //label[normalize-space(.)={label}]/@for]"
            )
        }
        Locator::ShareControl(strategy) => share_xpath(*strategy),
    }
}

fn share_xpath(strategy: ShareStrategy) -> String {
    match strategy {
        ShareStrategy::ExactLabel => format!(".//{}[normalize-space(.)='Share']", CLICKABLE),
        ShareStrategy::Substring => format!(
            ".//{}[contains(translate(normalize-space(.), 'SHARE', 'share'), 'share')]",
            CLICKABLE
        ),
        ShareStrategy::Attribute => ".//*[contains(translate(@title, 'SHARE', 'share'), 'share') \
             or contains(translate(@aria-label, 'SHARE', 'share'), 'share')]"
            .to_string(),
        ShareStrategy::ClassHint => {
            ".//*[contains(translate(@class, 'SHARE', 'share'), 'share')]".to_string()
        }
    }
}

/// 弹层挂载在 body 下，与作用域无关
fn is_detached(locator: &Locator) -> bool {
    matches!(locator, Locator::OpenPopover)
}

/// 查找脚本：返回引用数组；作用域节点已失效时返回 null
pub fn find_all_script(scope_ref: Option<&str>, locator: &Locator) -> String {
    let scope = match scope_ref {
        Some(r) => serde_json::Value::String(r.to_string()).to_string(),
        None => "null".to_string(),
    };
    let xpath = serde_json::Value::String(locator_xpath(locator)).to_string();

    format!(
        r#"
        (() => {{
            const scopeRef = {scope};
            const root = scopeRef === null
                ? document
                : document.querySelector(`[{attr}="${{scopeRef}}"]`);
            if (!root) return null;
            const context = {detached} ? document : root;
            const snapshot = document.evaluate({xpath}, context, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null);
            window.__iolRefSeq = window.__iolRefSeq || 0;
            const refs = [];
            for (let i = 0; i < snapshot.snapshotLength; i++) {{
                const el = snapshot.snapshotItem(i);
                if (!el.getAttribute('{attr}')) {{
                    window.__iolRefSeq += 1;
                    el.setAttribute('{attr}', String(window.__iolRefSeq));
                }}
                refs.push(el.getAttribute('{attr}'));
            }}
            return refs;
        }})()
        "#,
        scope = scope,
        attr = REF_ATTRIBUTE,
        detached = is_detached(locator),
        xpath = xpath,
    )
}

/// 针对单个元素执行脚本体（脚本体中以 `el` 引用该元素）
///
/// 元素不存在时返回 `{ "missing": true }`，否则返回 `{ "value": ... }`。
pub fn element_script(reference: &str, body: &str) -> String {
    let reference = serde_json::Value::String(reference.to_string()).to_string();
    format!(
        r#"
        (() => {{
            const el = document.querySelector(`[{attr}="${{{reference}}}"]`);
            if (!el) return {{ missing: true }};
            const value = (() => {{ {body} }})();
            return {{ value: value === undefined ? null : value }};
        }})()
        "#,
        attr = REF_ATTRIBUTE,
        reference = reference,
        body = body,
    )
}
