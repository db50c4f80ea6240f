//! JS 执行器 - 基础设施层
//!
//! 持有唯一的 page 资源，对上只暴露 [`UiSurface`] 能力

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::input::{
    DispatchKeyEventParams, DispatchKeyEventType, DispatchMouseEventParams,
    DispatchMouseEventType, MouseButton,
};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::error::{AppResult, AutomationError};
use crate::infrastructure::locator_js::{element_script, find_all_script};
use crate::infrastructure::ui_surface::{ElementHandle, Locator, Scope, UiSurface, Viewport};

/// Ctrl 修饰键（CDP 中的位掩码）
const MODIFIER_CTRL: i64 = 2;

/// JS 执行器
///
/// 职责：
/// - 持有唯一的 Page 资源
/// - 暴露 eval() 能力
/// - 基于 eval() 和 CDP 输入事件实现 [`UiSurface`]
/// - 不认识请求、眼别或下拉框
pub struct JsExecutor {
    page: Page,
}

#[derive(Debug, Deserialize)]
struct Point {
    x: f64,
    y: f64,
}

impl JsExecutor {
    /// 创建新的 JS 执行器
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> AppResult<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> AppResult<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }

    /// 针对单个元素执行脚本体，元素已失效时返回 `ElementNotFound`
    async fn on_element<T: DeserializeOwned>(
        &self,
        element: &ElementHandle,
        body: &str,
    ) -> AppResult<T> {
        let result = self.eval(element_script(element.reference(), body)).await?;
        if result.get("missing").and_then(|v| v.as_bool()) == Some(true) {
            return Err(AutomationError::ElementNotFound(format!(
                "ref {}",
                element.reference()
            )));
        }
        let value = result.get("value").cloned().unwrap_or(JsonValue::Null);
        Ok(serde_json::from_value(value)?)
    }

    /// 滚动到可见位置并返回元素中心坐标
    async fn center_of(&self, element: &ElementHandle) -> AppResult<Point> {
        self.on_element(
            element,
            "el.scrollIntoView({ behavior: 'instant', block: 'center' });
             const r = el.getBoundingClientRect();
             return { x: r.left + r.width / 2, y: r.top + r.height / 2 };",
        )
        .await
    }

    async fn mouse(&self, kind: DispatchMouseEventType, point: &Point) -> AppResult<()> {
        let mut builder = DispatchMouseEventParams::builder()
            .r#type(kind.clone())
            .x(point.x)
            .y(point.y);
        if kind != DispatchMouseEventType::MouseMoved {
            builder = builder.button(MouseButton::Left).click_count(1);
        }
        let cmd = builder.build().map_err(AutomationError::Script)?;
        self.page.execute(cmd).await?;
        Ok(())
    }

    async fn press_and_release(&self, point: &Point) -> AppResult<()> {
        self.mouse(DispatchMouseEventType::MousePressed, point).await?;
        self.mouse(DispatchMouseEventType::MouseReleased, point).await
    }

    async fn key(
        &self,
        kind: DispatchKeyEventType,
        key: &str,
        code: &str,
        virtual_key: i64,
        modifiers: i64,
    ) -> AppResult<()> {
        let cmd = DispatchKeyEventParams::builder()
            .r#type(kind)
            .key(key)
            .code(code)
            .windows_virtual_key_code(virtual_key)
            .modifiers(modifiers)
            .build()
            .map_err(AutomationError::Script)?;
        self.page.execute(cmd).await?;
        Ok(())
    }

    async fn key_stroke(&self, key: &str, code: &str, virtual_key: i64, modifiers: i64) -> AppResult<()> {
        self.key(DispatchKeyEventType::RawKeyDown, key, code, virtual_key, modifiers)
            .await?;
        self.key(DispatchKeyEventType::KeyUp, key, code, virtual_key, modifiers)
            .await
    }
}

#[async_trait]
impl UiSurface for JsExecutor {
    async fn navigate(&self, url: &str) -> AppResult<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| AutomationError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        Ok(())
    }

    async fn find_all(&self, scope: Scope<'_>, locator: &Locator) -> AppResult<Vec<ElementHandle>> {
        let scope_ref = match scope {
            Scope::Page => None,
            Scope::Within(element) => Some(element.reference()),
        };
        let refs: Option<Vec<String>> = self.eval_as(find_all_script(scope_ref, locator)).await?;
        match refs {
            Some(refs) => Ok(refs.into_iter().map(ElementHandle::new).collect()),
            None => Err(AutomationError::ElementNotFound(format!(
                "scope ref {} for {:?}",
                scope_ref.unwrap_or("-"),
                locator
            ))),
        }
    }

    async fn attribute(&self, element: &ElementHandle, name: &str) -> AppResult<Option<String>> {
        let name = serde_json::Value::String(name.to_string()).to_string();
        self.on_element(element, &format!("return el.getAttribute({});", name))
            .await
    }

    async fn text(&self, element: &ElementHandle) -> AppResult<String> {
        self.on_element(
            element,
            "return (el.innerText || el.textContent || '').replace(/\\s+/g, ' ').trim();",
        )
        .await
    }

    async fn is_actionable(&self, element: &ElementHandle) -> AppResult<bool> {
        self.on_element(
            element,
            "const r = el.getBoundingClientRect();
             const s = window.getComputedStyle(el);
             return r.width > 0 && r.height > 0
                 && s.visibility !== 'hidden' && s.display !== 'none'
                 && !el.disabled && el.getAttribute('aria-disabled') !== 'true';",
        )
        .await
    }

    async fn is_checked(&self, element: &ElementHandle) -> AppResult<bool> {
        self.on_element(
            element,
            "if (el.type === 'checkbox' && typeof el.checked === 'boolean') return el.checked;
             return el.getAttribute('aria-checked') === 'true';",
        )
        .await
    }

    async fn hover_click(&self, element: &ElementHandle) -> AppResult<()> {
        let point = self.center_of(element).await?;
        self.mouse(DispatchMouseEventType::MouseMoved, &point).await?;
        self.press_and_release(&point).await?;
        debug!("悬停并点击元素 ref={} ({:.0}, {:.0})", element.reference(), point.x, point.y);
        Ok(())
    }

    async fn click(&self, element: &ElementHandle) -> AppResult<()> {
        let point = self.center_of(element).await?;
        self.press_and_release(&point).await
    }

    async fn dispatch_click(&self, element: &ElementHandle) -> AppResult<()> {
        self.on_element(element, "el.click();").await
    }

    async fn scroll_into_view(&self, element: &ElementHandle) -> AppResult<()> {
        self.on_element(
            element,
            "el.scrollIntoView({ behavior: 'instant', block: 'center' });",
        )
        .await
    }

    async fn clear_input(&self, element: &ElementHandle) -> AppResult<()> {
        self.click(element).await?;
        self.on_element::<()>(element, "el.focus();").await?;
        self.key_stroke("a", "KeyA", 65, MODIFIER_CTRL).await?;
        self.key_stroke("Backspace", "Backspace", 8, 0).await
    }

    async fn type_text(&self, element: &ElementHandle, text: &str) -> AppResult<()> {
        self.on_element::<()>(element, "el.focus();").await?;
        for c in text.chars() {
            let key_down = DispatchKeyEventParams::builder()
                .r#type(DispatchKeyEventType::KeyDown)
                .text(c.to_string())
                .build()
                .map_err(AutomationError::Script)?;
            self.page.execute(key_down).await?;

            let key_up = DispatchKeyEventParams::builder()
                .r#type(DispatchKeyEventType::KeyUp)
                .text(c.to_string())
                .build()
                .map_err(AutomationError::Script)?;
            self.page.execute(key_up).await?;
        }
        Ok(())
    }

    async fn current_url(&self) -> AppResult<String> {
        Ok(self.page.url().await?.unwrap_or_default())
    }

    async fn scroll_to_top(&self) -> AppResult<()> {
        self.eval("(() => { window.scrollTo(0, 0); return true; })()")
            .await?;
        Ok(())
    }

    async fn viewport(&self) -> AppResult<Viewport> {
        let size: JsonValue = self
            .eval("({ width: window.innerWidth, height: window.innerHeight })")
            .await?;
        let dimension = |key: &str| size.get(key).and_then(|v| v.as_u64()).map(|v| v as u32);
        match (dimension("width"), dimension("height")) {
            (Some(width), Some(height)) => Ok(Viewport { width, height }),
            _ => Err(AutomationError::Script(format!("unexpected viewport: {}", size))),
        }
    }

    async fn set_viewport(&self, viewport: Viewport) -> AppResult<()> {
        let cmd = SetDeviceMetricsOverrideParams::builder()
            .width(viewport.width as i64)
            .height(viewport.height as i64)
            .device_scale_factor(1.0)
            .mobile(false)
            .build()
            .map_err(AutomationError::Script)?;
        self.page.execute(cmd).await?;
        Ok(())
    }

    async fn capture_png(&self) -> AppResult<Vec<u8>> {
        let bytes = self
            .page
            .screenshot(
                ScreenshotParams::builder()
                    .format(CaptureScreenshotFormat::Png)
                    .build(),
            )
            .await?;
        Ok(bytes)
    }
}
