use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use serde_json::Value as JsonValue;

/// 眼别区块中路由到"制造商"下拉框的键
pub const MANUFACTURER_KEY: &str = "Manufacturer";
/// 眼别区块中路由到"人工晶体型号"下拉框的键
pub const SELECTED_DEVICE_KEY: &str = "Select IOL";
/// 眼别区块中存放开关状态的键
pub const SWITCHES_KEY: &str = "switches";

const MANUFACTURER_ALIASES: [&str; 2] = [MANUFACTURER_KEY, "manufacturer"];
const SELECTED_DEVICE_ALIASES: [&str; 3] = [SELECTED_DEVICE_KEY, "selected_device", "selectedDevice"];

/// 一次计算请求，运行期间不可变
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalculationRequest {
    /// 患者信息字段，缺省的键直接跳过
    #[serde(default)]
    pub top_fields: BTreeMap<TopField, FieldValue>,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default, alias = "rightEye")]
    pub right_eye: Option<EyeConfig>,
    #[serde(default, alias = "leftEye")]
    pub left_eye: Option<EyeConfig>,
}

impl CalculationRequest {
    /// 返回需要配置的眼别区块（按 OD、OS 顺序，跳过空配置）
    pub fn eye_sections(&self) -> Vec<(EyeSection, &EyeConfig)> {
        [
            (EyeSection::Od, self.right_eye.as_ref()),
            (EyeSection::Os, self.left_eye.as_ref()),
        ]
        .into_iter()
        .filter_map(|(section, config)| config.filter(|c| !c.is_empty()).map(|c| (section, c)))
        .collect()
    }
}

/// 性别
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[default]
    #[serde(alias = "female")]
    Female,
    #[serde(alias = "male")]
    Male,
}

impl Gender {
    /// 下拉选项中显示的文本
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Female => "Female",
            Gender::Male => "Male",
        }
    }
}

/// 顶部患者信息字段（固定集合）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopField {
    Surgeon,
    PatientInitials,
    #[serde(rename = "id", alias = "patient_id")]
    PatientId,
    Age,
}

impl TopField {
    /// 页面上对应的 label 文本
    pub fn label(&self) -> &'static str {
        match self {
            TopField::Surgeon => "Surgeon",
            TopField::PatientInitials => "Patient Initials",
            TopField::PatientId => "Id",
            TopField::Age => "Age",
        }
    }
}

/// 功能开关（固定集合，声明顺序即应用顺序）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SwitchKind {
    /// 散光矫正晶体
    Toric,
    /// 圆锥角膜（不规则角膜）
    Keratoconus,
    /// Argos 眼轴测量设备
    Argos,
    /// 既往屈光手术
    #[serde(rename = "Post Refractive")]
    PostRefractive,
}

impl SwitchKind {
    pub const ALL: [SwitchKind; 4] = [
        SwitchKind::Toric,
        SwitchKind::Keratoconus,
        SwitchKind::Argos,
        SwitchKind::PostRefractive,
    ];

    /// 开关旁显示的 label 文本
    pub fn label(&self) -> &'static str {
        match self {
            SwitchKind::Toric => "Toric",
            SwitchKind::Keratoconus => "Keratoconus",
            SwitchKind::Argos => "Argos",
            SwitchKind::PostRefractive => "Post Refractive",
        }
    }
}

/// 眼别区块
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EyeSection {
    /// 右眼
    Od,
    /// 左眼
    Os,
}

impl EyeSection {
    /// 区块标题中包含的文本
    pub fn heading(&self) -> &'static str {
        match self {
            EyeSection::Od => "OD Right",
            EyeSection::Os => "OS Left",
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            EyeSection::Od => "OD",
            EyeSection::Os => "OS",
        }
    }
}

impl fmt::Display for EyeSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// 文本字段的值，接受字符串或数字
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldValue(String);

impl FieldValue {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 按请求中的原始写法取值：字符串取内容，数字保留字面量（`-0.50` 仍是 `-0.50`）
    fn from_raw(raw: &RawValue) -> Option<Self> {
        let literal = raw.get().trim();
        match serde_json::from_str::<JsonValue>(literal).ok()? {
            JsonValue::String(s) => Some(Self(s)),
            JsonValue::Number(_) => Some(Self(literal.to_string())),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        FieldValue::from_raw(&raw)
            .ok_or_else(|| serde::de::Error::custom("expected a string or a number"))
    }
}

/// 单只眼的配置
///
/// 保留键（制造商、晶体型号、开关）永远不会进入 `fields`：
/// 所有写入都经过 [`EyeConfig::with_field`] 路由到各自的处理器。
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "BTreeMap<String, Box<RawValue>>")]
pub struct EyeConfig {
    fields: BTreeMap<String, FieldValue>,
    manufacturer: Option<String>,
    selected_device: Option<String>,
    switches: BTreeMap<SwitchKind, bool>,
}

impl EyeConfig {
    /// 写入一个键值；保留键会被路由到对应的下拉框
    pub fn with_field(mut self, label: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        let label = label.into();
        let value = value.into();
        if is_manufacturer_key(&label) {
            self.manufacturer = Some(value.0);
        } else if is_selected_device_key(&label) {
            self.selected_device = Some(value.0);
        } else if label != SWITCHES_KEY {
            self.fields.insert(label, value);
        }
        self
    }

    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    pub fn with_selected_device(mut self, device: impl Into<String>) -> Self {
        self.selected_device = Some(device.into());
        self
    }

    pub fn with_switch(mut self, switch: SwitchKind, on: bool) -> Self {
        self.switches.insert(switch, on);
        self
    }

    /// 自由文本字段（label → 值）
    pub fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }

    pub fn manufacturer(&self) -> Option<&str> {
        self.manufacturer.as_deref()
    }

    pub fn selected_device(&self) -> Option<&str> {
        self.selected_device.as_deref()
    }

    /// 按固定枚举顺序返回需要设置的开关
    pub fn switches(&self) -> impl Iterator<Item = (SwitchKind, bool)> + '_ {
        SwitchKind::ALL
            .into_iter()
            .filter_map(|kind| self.switches.get(&kind).map(|on| (kind, *on)))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
            && self.manufacturer.is_none()
            && self.selected_device.is_none()
            && self.switches.is_empty()
    }
}

fn is_manufacturer_key(key: &str) -> bool {
    MANUFACTURER_ALIASES.contains(&key)
}

fn is_selected_device_key(key: &str) -> bool {
    SELECTED_DEVICE_ALIASES.contains(&key)
}

impl TryFrom<BTreeMap<String, Box<RawValue>>> for EyeConfig {
    type Error = String;

    fn try_from(raw: BTreeMap<String, Box<RawValue>>) -> Result<Self, Self::Error> {
        let mut config = EyeConfig::default();

        for (key, value) in raw {
            if value.get().trim() == "null" {
                continue;
            }

            if key == SWITCHES_KEY {
                config.switches = serde_json::from_str(value.get())
                    .map_err(|e| format!("invalid '{}': {}", SWITCHES_KEY, e))?;
                continue;
            }

            let text = FieldValue::from_raw(&value)
                .ok_or_else(|| format!("field '{}' must be a string or a number", key))?;
            config = config.with_field(key, text);
        }

        Ok(config)
    }
}
