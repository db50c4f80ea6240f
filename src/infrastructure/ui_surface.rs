//! 页面能力接口 - 基础设施层
//!
//! 所有阶段只依赖 [`UiSurface`]，不直接接触 chromiumoxide 的 `Page`。
//! 元素通过语义化的 [`Locator`] 查找，返回不透明的 [`ElementHandle`]。

use async_trait::async_trait;

use crate::error::AppResult;

/// 页面元素的不透明句柄
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementHandle(String);

impl ElementHandle {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn reference(&self) -> &str {
        &self.0
    }
}

/// 查找范围：整页或某个区块
#[derive(Debug, Clone, Copy)]
pub enum Scope<'a> {
    Page,
    Within(&'a ElementHandle),
}

/// 文本匹配方式（均先做空白归一化）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextMatch {
    Exact(String),
    Contains(String),
}

/// 分享控件的查找策略，按声明顺序依次尝试
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareStrategy {
    /// 按钮或链接文本恰好为 "Share"
    ExactLabel,
    /// 文本中包含 "share"（忽略大小写）
    Substring,
    /// title / aria-label 属性中包含 "share"
    Attribute,
    /// class 中包含 "share"
    ClassHint,
}

impl ShareStrategy {
    pub const ALL: [ShareStrategy; 4] = [
        ShareStrategy::ExactLabel,
        ShareStrategy::Substring,
        ShareStrategy::Attribute,
        ShareStrategy::ClassHint,
    ];
}

/// 语义化的元素定位方式
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// 按钮（按内部文本匹配）
    Button(TextMatch),
    /// 复选框组中的第 n 个（从 1 开始）
    NthCheckbox(usize),
    /// 文本完全匹配的 label
    Label(String),
    /// 指定 id 的元素
    Id(String),
    /// 标题包含给定文本的眼别区块根节点
    SectionByHeading(String),
    /// 范围内全部文本输入框（不含 checkbox / radio）
    TextInputs,
    /// 与指定 input id 绑定的 label
    LabelFor(String),
    /// 下拉框触发容器；`None` 表示不限 label
    SelectTrigger(Option<String>),
    /// 当前打开的下拉弹层
    OpenPopover,
    /// 弹层中文本完全匹配的列表项
    ListItem(String),
    /// 弹层中的全部列表项
    ListItems,
    /// 按 label 匹配的开关底层布尔控件
    Switch(String),
    /// 分享控件
    ShareControl(ShareStrategy),
}

/// 视口大小
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// 自动化所需的全部页面能力
#[async_trait]
pub trait UiSurface: Send + Sync {
    /// 导航到指定地址
    async fn navigate(&self, url: &str) -> AppResult<()>;

    /// 在范围内查找全部匹配元素（文档顺序）
    async fn find_all(&self, scope: Scope<'_>, locator: &Locator) -> AppResult<Vec<ElementHandle>>;

    /// 在范围内查找第一个匹配元素
    async fn find(&self, scope: Scope<'_>, locator: &Locator) -> AppResult<Option<ElementHandle>> {
        Ok(self.find_all(scope, locator).await?.into_iter().next())
    }

    async fn attribute(&self, element: &ElementHandle, name: &str) -> AppResult<Option<String>>;

    /// 空白归一化后的可见文本
    async fn text(&self, element: &ElementHandle) -> AppResult<String>;

    /// 元素可见且未禁用
    async fn is_actionable(&self, element: &ElementHandle) -> AppResult<bool>;

    async fn is_checked(&self, element: &ElementHandle) -> AppResult<bool>;

    /// 先悬停再点击（自定义下拉框需要悬停建立交互状态）
    async fn hover_click(&self, element: &ElementHandle) -> AppResult<()>;

    /// 模拟指针点击
    async fn click(&self, element: &ElementHandle) -> AppResult<()>;

    /// 通过脚本直接派发点击事件，绕过遮挡层
    async fn dispatch_click(&self, element: &ElementHandle) -> AppResult<()>;

    async fn scroll_into_view(&self, element: &ElementHandle) -> AppResult<()>;

    /// 全选后删除（不使用控件自带的清空）
    async fn clear_input(&self, element: &ElementHandle) -> AppResult<()>;

    /// 一次输入事件
    async fn type_text(&self, element: &ElementHandle, text: &str) -> AppResult<()>;

    async fn current_url(&self) -> AppResult<String>;

    async fn scroll_to_top(&self) -> AppResult<()>;

    async fn viewport(&self) -> AppResult<Viewport>;

    async fn set_viewport(&self, viewport: Viewport) -> AppResult<()>;

    /// 截取当前视口的 PNG
    async fn capture_png(&self) -> AppResult<Vec<u8>>;
}
