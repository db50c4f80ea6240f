//! 内存中的计算器页面
//!
//! 按页面真实的交互协议建模：下拉框只有悬停点击才会打开，型号列表依赖制造商，
//! 部分字段只有打开对应开关后才渲染，"Target Refraction" 会吞掉整体输入的负号。

#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use iol_calculator_submit::config::Config;
use iol_calculator_submit::error::{AppResult, AutomationError};
use iol_calculator_submit::infrastructure::{
    AutomationSession, ElementHandle, Locator, Scope, SessionLauncher, ShareStrategy, TextMatch,
    UiSurface, Viewport,
};
use iol_calculator_submit::workflow::RunCtx;

pub const APP_URL: &str = "https://iolcalculator.escrs.org/";
pub const SHARE_URL: &str = "https://iolcalculator.escrs.org/?share=abc123";
pub const FAKE_PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake-result-panel";

/// 注入的故障
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fault {
    Navigate,
    /// 同意按钮永远不出现
    Consent,
    /// 计算按钮永远不出现
    Calculate,
    Capture,
    PanicWhileTyping,
}

#[derive(Debug, Clone)]
pub struct FakeInput {
    pub id: String,
    pub label: String,
    pub value: String,
    /// 只有该开关打开时才渲染
    pub requires_switch: Option<String>,
}

impl FakeInput {
    pub fn new(id: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            value: String::new(),
            requires_switch: None,
        }
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self
    }

    pub fn requires(mut self, switch: &str) -> Self {
        self.requires_switch = Some(switch.to_string());
        self
    }
}

#[derive(Debug, Clone)]
pub struct FakeSelect {
    pub label: Option<String>,
    pub options: Vec<String>,
    pub selected: Option<String>,
}

impl FakeSelect {
    pub fn new(label: Option<&str>, options: &[&str]) -> Self {
        Self {
            label: label.map(str::to_string),
            options: options.iter().map(|o| o.to_string()).collect(),
            selected: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FakeSection {
    pub heading: String,
    pub inputs: Vec<FakeInput>,
    pub switches: BTreeMap<String, bool>,
    pub manufacturer: FakeSelect,
    pub device: FakeSelect,
    /// 制造商 → 型号
    pub catalog: BTreeMap<String, Vec<String>>,
}

impl FakeSection {
    fn new(tag: &str, heading: &str) -> Self {
        let catalog: BTreeMap<String, Vec<String>> = [
            ("Alcon", vec!["SN60WF", "SN60WF Toric", "SN6AT3"]),
            ("Zeiss", vec!["CT LUCIA 611P", "AT LISA tri 839MP"]),
        ]
        .into_iter()
        .map(|(m, devices)| (m.to_string(), devices.into_iter().map(str::to_string).collect()))
        .collect();

        let manufacturers: Vec<&str> = catalog.keys().map(String::as_str).collect();
        let manufacturer = FakeSelect::new(Some("Manufacturer"), &manufacturers);

        Self {
            heading: heading.to_string(),
            inputs: vec![
                FakeInput::new(&format!("{}-al", tag), "AL"),
                FakeInput::new(&format!("{}-k1", tag), "K1"),
                FakeInput::new(&format!("{}-k2", tag), "K2"),
                FakeInput::new(&format!("{}-acd", tag), "ACD"),
                FakeInput::new(&format!("{}-target", tag), "Target Refraction").with_value("0"),
                FakeInput::new(&format!("{}-k1-axis", tag), "K1 Axis").requires("Toric"),
            ],
            switches: ["Toric", "Keratoconus", "Argos", "Post Refractive"]
                .into_iter()
                .map(|s| (s.to_string(), false))
                .collect(),
            manufacturer,
            device: FakeSelect::new(Some("Select IOL"), &[]),
            catalog,
        }
    }

    fn switch_on(&self, name: &str) -> bool {
        self.switches.get(name).copied().unwrap_or(false)
    }

    fn visible_inputs(&self) -> impl Iterator<Item = &FakeInput> {
        self.inputs.iter().filter(|input| match &input.requires_switch {
            Some(switch) => self.switch_on(switch),
            None => true,
        })
    }
}

#[derive(Debug, Clone)]
pub struct FakeShare {
    /// 控件只对这一种查找策略可见
    pub strategy: ShareStrategy,
    pub onclick: Option<String>,
    /// 点击后页面跳转到的地址
    pub navigates_to: Option<String>,
}

/// 页面状态
#[derive(Debug)]
pub struct FakePage {
    pub consent_present: bool,
    pub consent_dismissed: bool,
    pub checkboxes: Vec<bool>,
    pub top_inputs: Vec<FakeInput>,
    pub gender: FakeSelect,
    /// 键为 "od" / "os"
    pub sections: BTreeMap<String, FakeSection>,
    pub open_select: Option<String>,
    pub stuck_switches: HashSet<String>,
    pub calculate_present: bool,
    pub calculated: bool,
    pub results_ready: bool,
    pub share: Option<FakeShare>,
    pub url: String,
    pub viewport: Viewport,
    pub events: Vec<String>,
    pub faults: HashSet<Fault>,
    pub launches: usize,
    pub closes: usize,
}

impl FakePage {
    /// 与真实计算器结构一致的页面
    pub fn calculator() -> Self {
        let sections = [("od", "OD Right"), ("os", "OS Left")]
            .into_iter()
            .map(|(tag, heading)| (tag.to_string(), FakeSection::new(tag, heading)))
            .collect();

        Self {
            consent_present: true,
            consent_dismissed: false,
            checkboxes: vec![false, false, false, true],
            top_inputs: vec![
                FakeInput::new("surgeon", "Surgeon"),
                FakeInput::new("initials", "Patient Initials"),
                FakeInput::new("patient-id", "Id"),
                FakeInput::new("age", "Age"),
            ],
            gender: FakeSelect::new(Some("Gender"), &["Female", "Male"]),
            sections,
            open_select: None,
            stuck_switches: HashSet::new(),
            calculate_present: true,
            calculated: false,
            results_ready: true,
            share: Some(FakeShare {
                strategy: ShareStrategy::Substring,
                onclick: Some(format!("copyToClipboard('{}')", SHARE_URL)),
                navigates_to: None,
            }),
            url: "about:blank".to_string(),
            viewport: Viewport {
                width: 1920,
                height: 1200,
            },
            events: Vec::new(),
            faults: HashSet::new(),
            launches: 0,
            closes: 0,
        }
    }

    pub fn section(&self, tag: &str) -> &FakeSection {
        &self.sections[tag]
    }

    pub fn section_mut(&mut self, tag: &str) -> &mut FakeSection {
        self.sections
            .get_mut(tag)
            .unwrap_or_else(|| panic!("no section {}", tag))
    }

    /// 按 id 找输入框（含所属区块）
    pub fn input(&self, id: &str) -> Option<&FakeInput> {
        self.top_inputs
            .iter()
            .chain(self.sections.values().flat_map(|s| s.inputs.iter()))
            .find(|input| input.id == id)
    }

    pub fn value_of(&self, id: &str) -> String {
        self.input(id).map(|i| i.value.clone()).unwrap_or_default()
    }

    /// 事件在日志中首次出现的位置
    pub fn position(&self, event: &str) -> Option<usize> {
        self.events.iter().position(|e| e == event)
    }

    fn input_mut(&mut self, id: &str) -> Option<&mut FakeInput> {
        if let Some(input) = self.top_inputs.iter_mut().find(|i| i.id == id) {
            return Some(input);
        }
        self.sections
            .values_mut()
            .flat_map(|s| s.inputs.iter_mut())
            .find(|input| input.id == id)
    }

    fn buttons(&self) -> Vec<&'static str> {
        let mut buttons = Vec::new();
        if self.consent_present && !self.consent_dismissed && !self.faults.contains(&Fault::Consent) {
            buttons.push("I Agree");
        }
        if self.calculate_present && !self.faults.contains(&Fault::Calculate) {
            buttons.push("Calculate IOL");
        }
        if self.calculated && self.results_ready {
            buttons.push("Print");
        }
        buttons
    }

    /// 范围内可见的输入框
    fn visible_inputs(&self, scope: &Node) -> Vec<FakeInput> {
        match scope {
            Node::Page => self
                .top_inputs
                .iter()
                .cloned()
                .chain(self.sections.values().flat_map(|s| s.visible_inputs().cloned()))
                .collect(),
            Node::Section(tag) => self
                .sections
                .get(tag)
                .map(|s| s.visible_inputs().cloned().collect())
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    /// 范围内的下拉框键
    fn select_keys(&self, scope: &Node) -> Vec<String> {
        match scope {
            Node::Page => {
                let mut keys = vec!["gender".to_string()];
                for tag in self.sections.keys() {
                    keys.push(format!("{}:Manufacturer", tag));
                    keys.push(format!("{}:Select IOL", tag));
                }
                keys
            }
            Node::Section(tag) => vec![
                format!("{}:Manufacturer", tag),
                format!("{}:Select IOL", tag),
            ],
            _ => Vec::new(),
        }
    }

    fn select(&self, key: &str) -> Option<FakeSelect> {
        if key == "gender" {
            return Some(self.gender.clone());
        }
        let (tag, label) = key.split_once(':')?;
        let section = self.sections.get(tag)?;
        match label {
            "Manufacturer" => Some(section.manufacturer.clone()),
            "Select IOL" => {
                let mut device = section.device.clone();
                device.options = section
                    .manufacturer
                    .selected
                    .as_ref()
                    .and_then(|m| section.catalog.get(m))
                    .cloned()
                    .unwrap_or_default();
                Some(device)
            }
            _ => None,
        }
    }

    fn choose(&mut self, key: &str, value: &str) {
        self.events.push(format!("select {}={}", key, value));
        self.open_select = None;
        if key == "gender" {
            self.gender.selected = Some(value.to_string());
            return;
        }
        let Some((tag, label)) = key.split_once(':') else {
            return;
        };
        let Some(section) = self.sections.get_mut(tag) else {
            return;
        };
        match label {
            "Manufacturer" => {
                section.manufacturer.selected = Some(value.to_string());
                section.device.selected = None;
            }
            _ => section.device.selected = Some(value.to_string()),
        }
    }

    fn find_all(&self, scope: &Node, locator: &Locator) -> Vec<Node> {
        match locator {
            Locator::Button(matcher) => self
                .buttons()
                .into_iter()
                .filter(|text| match matcher {
                    TextMatch::Exact(t) => text == t,
                    TextMatch::Contains(t) => text.contains(t.as_str()),
                })
                .map(|text| Node::Button(text.to_string()))
                .collect(),
            Locator::NthCheckbox(n) if *n >= 1 && *n <= self.checkboxes.len() => {
                vec![Node::Checkbox(*n)]
            }
            Locator::NthCheckbox(_) => Vec::new(),
            Locator::Label(text) => self
                .visible_inputs(scope)
                .into_iter()
                .filter(|i| &i.label == text)
                .map(|i| Node::Label(i.id))
                .collect(),
            Locator::Id(id) => self
                .visible_inputs(scope)
                .into_iter()
                .filter(|i| &i.id == id)
                .map(|i| Node::Input(i.id))
                .collect(),
            Locator::LabelFor(id) => self
                .visible_inputs(scope)
                .into_iter()
                .filter(|i| &i.id == id)
                .map(|i| Node::Label(i.id))
                .collect(),
            Locator::SectionByHeading(heading) => self
                .sections
                .iter()
                .filter(|(_, s)| s.heading.contains(heading.as_str()))
                .map(|(tag, _)| Node::Section(tag.clone()))
                .collect(),
            Locator::TextInputs => self
                .visible_inputs(scope)
                .into_iter()
                .map(|i| Node::Input(i.id))
                .collect(),
            Locator::SelectTrigger(label) => self
                .select_keys(scope)
                .into_iter()
                .filter(|key| match (label, self.select(key)) {
                    (_, None) => false,
                    (None, Some(_)) => true,
                    (Some(label), Some(select)) => select.label.as_ref() == Some(label),
                })
                .map(Node::Select)
                .collect(),
            Locator::OpenPopover => self.open_select.iter().map(|_| Node::Popover).collect(),
            Locator::ListItem(text) => self
                .popover_options(scope)
                .into_iter()
                .filter(|o| o == text)
                .map(Node::Item)
                .collect(),
            Locator::ListItems => self
                .popover_options(scope)
                .into_iter()
                .map(Node::Item)
                .collect(),
            Locator::Switch(label) => match scope {
                Node::Section(tag) => self
                    .sections
                    .get(tag)
                    .filter(|s| s.switches.contains_key(label))
                    .map(|_| vec![Node::Switch(tag.clone(), label.clone())])
                    .unwrap_or_default(),
                _ => Vec::new(),
            },
            Locator::ShareControl(strategy) => self
                .share
                .iter()
                .filter(|share| share.strategy == *strategy)
                .map(|_| Node::Share)
                .collect(),
        }
    }

    fn popover_options(&self, scope: &Node) -> Vec<String> {
        match (scope, &self.open_select) {
            (Node::Popover, Some(key)) => self.select(key).map(|s| s.options).unwrap_or_default(),
            _ => Vec::new(),
        }
    }
}

/// 句柄解析后的节点
#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Page,
    Consent,
    Checkbox(usize),
    Label(String),
    Input(String),
    Section(String),
    Switch(String, String),
    Select(String),
    Popover,
    Item(String),
    Button(String),
    Share,
}

impl Node {
    fn handle(&self) -> ElementHandle {
        let reference = match self {
            Node::Page => "page".to_string(),
            Node::Consent => "consent".to_string(),
            Node::Checkbox(n) => format!("checkbox:{}", n),
            Node::Label(id) => format!("label:{}", id),
            Node::Input(id) => format!("input:{}", id),
            Node::Section(tag) => format!("section:{}", tag),
            Node::Switch(tag, label) => format!("switch:{}:{}", tag, label),
            Node::Select(key) => format!("select:{}", key),
            Node::Popover => "popover".to_string(),
            Node::Item(text) => format!("item:{}", text),
            Node::Button(text) => format!("button:{}", text),
            Node::Share => "share".to_string(),
        };
        ElementHandle::new(reference)
    }

    fn parse(handle: &ElementHandle) -> Node {
        let reference = handle.reference();
        let (kind, rest) = reference.split_once(':').unwrap_or((reference, ""));
        match kind {
            "consent" => Node::Consent,
            "checkbox" => Node::Checkbox(rest.parse().unwrap_or(0)),
            "label" => Node::Label(rest.to_string()),
            "input" => Node::Input(rest.to_string()),
            "section" => Node::Section(rest.to_string()),
            "switch" => {
                let (tag, label) = rest.split_once(':').unwrap_or((rest, ""));
                Node::Switch(tag.to_string(), label.to_string())
            }
            "select" => Node::Select(rest.to_string()),
            "popover" => Node::Popover,
            "item" => Node::Item(rest.to_string()),
            "button" if rest == "I Agree" => Node::Consent,
            "button" => Node::Button(rest.to_string()),
            "share" => Node::Share,
            _ => Node::Page,
        }
    }
}

/// 实现 [`UiSurface`] 的内存页面
#[derive(Clone)]
pub struct FakeUi {
    state: Arc<Mutex<FakePage>>,
}

impl FakeUi {
    pub fn new(page: FakePage) -> Self {
        Self {
            state: Arc::new(Mutex::new(page)),
        }
    }

    pub fn calculator() -> Self {
        Self::new(FakePage::calculator())
    }

    /// 读写页面状态；注入的 panic 可能让锁中毒，这里直接取回数据
    pub fn page(&self) -> MutexGuard<'_, FakePage> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn inject(&self, fault: Fault) {
        self.page().faults.insert(fault);
    }

    pub fn events(&self) -> Vec<String> {
        self.page().events.clone()
    }

    fn scope_node(scope: Scope<'_>) -> Node {
        match scope {
            Scope::Page => Node::Page,
            Scope::Within(handle) => Node::parse(handle),
        }
    }
}

#[async_trait]
impl UiSurface for FakeUi {
    async fn navigate(&self, url: &str) -> AppResult<()> {
        let mut page = self.page();
        if page.faults.contains(&Fault::Navigate) {
            return Err(AutomationError::Navigation {
                url: url.to_string(),
                reason: "net::ERR_NAME_NOT_RESOLVED".to_string(),
            });
        }
        page.url = url.to_string();
        page.events.push(format!("navigate {}", url));
        Ok(())
    }

    async fn find_all(&self, scope: Scope<'_>, locator: &Locator) -> AppResult<Vec<ElementHandle>> {
        let page = self.page();
        let scope = Self::scope_node(scope);
        let mut nodes = page.find_all(&scope, locator);
        // 同意按钮以专用节点表示
        for node in nodes.iter_mut() {
            if *node == Node::Button("I Agree".to_string()) {
                *node = Node::Consent;
            }
        }
        Ok(nodes.iter().map(Node::handle).collect())
    }

    async fn attribute(&self, element: &ElementHandle, name: &str) -> AppResult<Option<String>> {
        let page = self.page();
        Ok(match (Node::parse(element), name) {
            (Node::Label(id), "for") => Some(id),
            (Node::Input(id), "id") => Some(id),
            (Node::Share, "onclick") => page.share.as_ref().and_then(|s| s.onclick.clone()),
            _ => None,
        })
    }

    async fn text(&self, element: &ElementHandle) -> AppResult<String> {
        let page = self.page();
        Ok(match Node::parse(element) {
            Node::Label(id) => page.input(&id).map(|i| i.label.clone()).unwrap_or_default(),
            Node::Item(text) | Node::Button(text) => text,
            Node::Consent => "I Agree".to_string(),
            Node::Select(key) => page.select(&key).and_then(|s| s.selected).unwrap_or_default(),
            _ => String::new(),
        })
    }

    async fn is_actionable(&self, _element: &ElementHandle) -> AppResult<bool> {
        Ok(true)
    }

    async fn is_checked(&self, element: &ElementHandle) -> AppResult<bool> {
        let page = self.page();
        Ok(match Node::parse(element) {
            Node::Checkbox(n) => page.checkboxes.get(n.wrapping_sub(1)).copied().unwrap_or(false),
            Node::Switch(tag, label) => page.section(&tag).switch_on(&label),
            _ => false,
        })
    }

    async fn hover_click(&self, element: &ElementHandle) -> AppResult<()> {
        match Node::parse(element) {
            Node::Select(key) => {
                let mut page = self.page();
                page.events.push(format!("open {}", key));
                page.open_select = Some(key);
                Ok(())
            }
            _ => self.click(element).await,
        }
    }

    async fn click(&self, element: &ElementHandle) -> AppResult<()> {
        let mut page = self.page();
        match Node::parse(element) {
            Node::Consent => {
                page.consent_dismissed = true;
                page.events.push("agree".to_string());
            }
            Node::Checkbox(n) => {
                if let Some(checked) = page.checkboxes.get_mut(n.wrapping_sub(1)) {
                    *checked = !*checked;
                }
                page.events.push(format!("checkbox {}", n));
            }
            Node::Switch(tag, label) => {
                if !page.stuck_switches.contains(&label) {
                    let section = page.section_mut(&tag);
                    let on = !section.switch_on(&label);
                    section.switches.insert(label.clone(), on);
                    page.events.push(format!("switch {} {}={}", tag, label, on));
                } else {
                    page.events.push(format!("switch {} {} stuck", tag, label));
                }
            }
            Node::Item(text) => {
                let Some(key) = page.open_select.clone() else {
                    return Err(AutomationError::ElementNotFound(format!("item {}", text)));
                };
                page.choose(&key, &text);
            }
            Node::Share => {
                page.events.push("click share".to_string());
                if let Some(target) = page.share.as_ref().and_then(|s| s.navigates_to.clone()) {
                    page.url = target;
                }
            }
            // 普通点击打不开下拉框
            Node::Select(key) => page.events.push(format!("click {}", key)),
            Node::Button(text) => page.events.push(format!("click {}", text)),
            other => page.events.push(format!("click {:?}", other)),
        }
        Ok(())
    }

    async fn dispatch_click(&self, element: &ElementHandle) -> AppResult<()> {
        let mut page = self.page();
        if let Node::Button(text) = Node::parse(element) {
            if text.contains("Calculate") {
                page.calculated = true;
            }
            page.events.push(format!("dispatch {}", text));
        }
        Ok(())
    }

    async fn scroll_into_view(&self, element: &ElementHandle) -> AppResult<()> {
        self.page()
            .events
            .push(format!("scroll {}", element.reference()));
        Ok(())
    }

    async fn clear_input(&self, element: &ElementHandle) -> AppResult<()> {
        let mut page = self.page();
        if let Node::Input(id) = Node::parse(element) {
            let label = match page.input_mut(&id) {
                Some(input) => {
                    input.value.clear();
                    input.label.clone()
                }
                None => return Err(AutomationError::ElementNotFound(id)),
            };
            page.events.push(format!("clear {}", label));
        }
        Ok(())
    }

    async fn type_text(&self, element: &ElementHandle, text: &str) -> AppResult<()> {
        let mut page = self.page();
        if page.faults.contains(&Fault::PanicWhileTyping) {
            drop(page);
            panic!("renderer crashed while typing");
        }
        let Node::Input(id) = Node::parse(element) else {
            return Ok(());
        };
        let label = match page.input_mut(&id) {
            Some(input) => {
                // 格式化逻辑会吞掉和数字一起输入的负号
                let typed = match text.strip_prefix('-') {
                    Some(rest) if input.label == "Target Refraction" && !rest.is_empty() => rest,
                    _ => text,
                };
                input.value.push_str(typed);
                input.label.clone()
            }
            None => return Err(AutomationError::ElementNotFound(id)),
        };
        page.events.push(format!("type {} {}", label, text));
        Ok(())
    }

    async fn current_url(&self) -> AppResult<String> {
        Ok(self.page().url.clone())
    }

    async fn scroll_to_top(&self) -> AppResult<()> {
        self.page().events.push("scroll top".to_string());
        Ok(())
    }

    async fn viewport(&self) -> AppResult<Viewport> {
        Ok(self.page().viewport)
    }

    async fn set_viewport(&self, viewport: Viewport) -> AppResult<()> {
        let mut page = self.page();
        page.viewport = viewport;
        page.events
            .push(format!("viewport {}x{}", viewport.width, viewport.height));
        Ok(())
    }

    async fn capture_png(&self) -> AppResult<Vec<u8>> {
        let mut page = self.page();
        if page.faults.contains(&Fault::Capture) {
            return Err(AutomationError::Script("capture failed".to_string()));
        }
        page.events.push("capture".to_string());
        Ok(FAKE_PNG.to_vec())
    }
}

/// 包装内存页面的会话
pub struct FakeSession {
    ui: FakeUi,
}

#[async_trait]
impl AutomationSession for FakeSession {
    fn surface(&self) -> &dyn UiSurface {
        &self.ui
    }

    async fn close(&self) -> AppResult<()> {
        let mut page = self.ui.page();
        page.closes += 1;
        page.events.push("close".to_string());
        Ok(())
    }
}

/// 每次启动都返回同一个内存页面的会话工厂
#[derive(Clone)]
pub struct FakeLauncher {
    pub ui: FakeUi,
    pub fail: bool,
}

impl FakeLauncher {
    pub fn new(ui: FakeUi) -> Self {
        Self { ui, fail: false }
    }

    pub fn failing(ui: FakeUi) -> Self {
        Self { ui, fail: true }
    }
}

#[async_trait]
impl SessionLauncher for FakeLauncher {
    async fn launch(&self, _ctx: &RunCtx) -> AppResult<Box<dyn AutomationSession>> {
        if self.fail {
            return Err(AutomationError::Launch("chrome executable not found".to_string()));
        }
        self.ui.page().launches += 1;
        Ok(Box::new(FakeSession { ui: self.ui.clone() }))
    }
}

pub fn test_config() -> Config {
    Config {
        target_url: APP_URL.to_string(),
        ..Config::default()
    }
}

/// 临时目录中的唯一截图路径
pub fn artifact_path() -> PathBuf {
    std::env::temp_dir()
        .join("iol-calculator-tests")
        .join(format!("{}.png", uuid::Uuid::new_v4()))
}

pub fn run_ctx() -> RunCtx {
    RunCtx::new(uuid::Uuid::new_v4().to_string(), artifact_path())
}
