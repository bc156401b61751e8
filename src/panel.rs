//! Control-panel binding: named groups of bounded, tunable parameters with
//! a one-shot "export current values to the clipboard" action per group.
//!
//! The widget rendering itself lives in the host; this module owns the
//! contract: declared bounds always hold, edits clamp, and the export blob
//! is pretty JSON that re-parses to the same value set.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PanelError {
    #[error("unknown parameter `{0}`")]
    UnknownParam(String),
    #[error("parameter `{0}` was set with a value of the wrong shape")]
    TypeMismatch(String),
    #[error("group has no export action")]
    NoExportAction,
    #[error("failed to serialize export blob")]
    Serialize,
}

/// A tunable value. Colors travel as `#rrggbb` strings, matching what the
/// control surface shows and what the export blob contains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Float(f32),
    Vec3([f32; 3]),
    Color(String),
}

/// One declared parameter: current value plus optional bounds and step.
/// `step` is a hint for the editing widget and never snaps values here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub value: ParamValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f32>,
}

impl Param {
    pub fn float(value: f32) -> Self {
        Self {
            value: ParamValue::Float(value),
            min: None,
            max: None,
            step: None,
        }
    }

    pub fn bounded(value: f32, min: f32, max: f32, step: Option<f32>) -> Self {
        Self {
            value: ParamValue::Float(value.clamp(min, max)),
            min: Some(min),
            max: Some(max),
            step,
        }
    }

    pub fn vec3(value: [f32; 3], step: Option<f32>) -> Self {
        Self {
            value: ParamValue::Vec3(value),
            min: None,
            max: None,
            step,
        }
    }

    pub fn color(hex: impl Into<String>) -> Self {
        Self {
            value: ParamValue::Color(hex.into()),
            min: None,
            max: None,
            step: None,
        }
    }

    fn clamped(&self, incoming: ParamValue) -> Result<ParamValue, ()> {
        let clamp = |v: f32| {
            let v = self.min.map_or(v, |min| v.max(min));
            self.max.map_or(v, |max| v.min(max))
        };
        match (&self.value, incoming) {
            (ParamValue::Float(_), ParamValue::Float(v)) => Ok(ParamValue::Float(clamp(v))),
            (ParamValue::Vec3(_), ParamValue::Vec3(v)) => {
                Ok(ParamValue::Vec3([clamp(v[0]), clamp(v[1]), clamp(v[2])]))
            }
            (ParamValue::Color(_), ParamValue::Color(v)) => Ok(ParamValue::Color(v)),
            _ => Err(()),
        }
    }
}

/// Group-scoped export action: reads the group's current values, strips the
/// listed keys, and writes the serialized remainder to the clipboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportAction {
    pub label: String,
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// An ordered, named set of parameters bound to live scene attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamGroup {
    pub name: String,
    params: Vec<(String, Param)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    export: Option<ExportAction>,
}

impl ParamGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            export: None,
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, param: Param) -> Self {
        self.params.push((name.into(), param));
        self
    }

    pub fn with_export(mut self, label: impl Into<String>, exclude: &[&str]) -> Self {
        self.export = Some(ExportAction {
            label: label.into(),
            exclude: exclude.iter().map(|s| s.to_string()).collect(),
        });
        self
    }

    pub fn get(&self, name: &str) -> Option<&Param> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, param)| param)
    }

    pub fn float(&self, name: &str) -> Option<f32> {
        match self.get(name)?.value {
            ParamValue::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn vec3(&self, name: &str) -> Option<[f32; 3]> {
        match self.get(name)?.value {
            ParamValue::Vec3(v) => Some(v),
            _ => None,
        }
    }

    pub fn color(&self, name: &str) -> Option<&str> {
        match &self.get(name)?.value {
            ParamValue::Color(hex) => Some(hex),
            _ => None,
        }
    }

    /// Applies an edit. Out-of-range floats land on the nearest bound; a
    /// value of the wrong shape is rejected, so declared invariants hold by
    /// construction.
    pub fn set(&mut self, name: &str, value: ParamValue) -> Result<(), PanelError> {
        let entry = self
            .params
            .iter_mut()
            .find(|(key, _)| key == name)
            .ok_or_else(|| PanelError::UnknownParam(name.to_string()))?;
        let clamped = entry
            .1
            .clamped(value)
            .map_err(|_| PanelError::TypeMismatch(name.to_string()))?;
        entry.1.value = clamped;
        Ok(())
    }

    /// Iterates parameters in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Param)> {
        self.params
            .iter()
            .map(|(name, param)| (name.as_str(), param))
    }

    pub fn export_action(&self) -> Option<&ExportAction> {
        self.export.as_ref()
    }

    /// Serializes the current values (minus the excluded keys; the action
    /// entry is never a parameter and so never appears) as pretty JSON.
    pub fn export_text(&self) -> Result<String, PanelError> {
        let action = self.export.as_ref().ok_or(PanelError::NoExportAction)?;
        let mut map = Map::new();
        for (name, param) in &self.params {
            if action.exclude.iter().any(|key| key == name) {
                continue;
            }
            let value = match &param.value {
                ParamValue::Float(v) => json_float(*v),
                ParamValue::Vec3(v) => Value::from(v.iter().map(|c| json_float(*c)).collect::<Vec<_>>()),
                ParamValue::Color(hex) => Value::from(hex.clone()),
            };
            map.insert(name.clone(), value);
        }
        serde_json::to_string_pretty(&Value::Object(map)).map_err(|_| PanelError::Serialize)
    }

    /// Runs the export action: serialize, write to the clipboard, confirm.
    /// Clipboard failures propagate; callers treat the write as best-effort.
    pub fn run_export(&self, sink: &mut dyn ClipboardSink) -> anyhow::Result<String> {
        let text = self.export_text()?;
        sink.write_text(&text)?;
        log::info!("{} state copied to clipboard", self.name);
        Ok(text)
    }
}

/// Widening f32 straight to f64 turns 0.2 into 0.20000000298...; going
/// through the shortest decimal form keeps the blob readable.
fn json_float(value: f32) -> Value {
    let narrowed = value.to_string().parse::<f64>().unwrap_or(f64::from(value));
    Value::from(narrowed)
}

/// The whole tuning surface: one group per logical unit (glass material,
/// ground plane, camera).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlPanel {
    pub groups: Vec<ParamGroup>,
}

impl ControlPanel {
    pub fn group(&self, name: &str) -> Option<&ParamGroup> {
        self.groups.iter().find(|group| group.name == name)
    }

    pub fn group_mut(&mut self, name: &str) -> Option<&mut ParamGroup> {
        self.groups.iter_mut().find(|group| group.name == name)
    }
}

/// Write-only text sink for export blobs.
pub trait ClipboardSink {
    fn write_text(&mut self, text: &str) -> anyhow::Result<()>;
}

/// Captures writes in memory; used by tests and headless runs.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    pub contents: Option<String>,
}

impl ClipboardSink for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> anyhow::Result<()> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}

/// Prints the blob instead of touching an OS clipboard; the native viewer
/// has no clipboard collaborator, and the export is best-effort anyway.
#[derive(Debug, Default)]
pub struct StdoutClipboard;

impl ClipboardSink for StdoutClipboard {
    fn write_text(&mut self, text: &str) -> anyhow::Result<()> {
        println!("{text}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glass_group() -> ParamGroup {
        ParamGroup::new("Glass Material")
            .with_param("thickness", Param::bounded(0.2, 0.0, 3.0, Some(0.05)))
            .with_param("roughness", Param::bounded(0.05, 0.0, 1.0, Some(0.01)))
            .with_param("color", Param::color("#ffffff"))
            .with_export("Save Material", &[])
    }

    #[test]
    fn set_clamps_to_declared_bounds() {
        let mut group = glass_group();
        group.set("thickness", ParamValue::Float(99.0)).unwrap();
        assert_eq!(group.float("thickness"), Some(3.0));
        group.set("thickness", ParamValue::Float(-1.0)).unwrap();
        assert_eq!(group.float("thickness"), Some(0.0));
        group.set("thickness", ParamValue::Float(1.25)).unwrap();
        assert_eq!(group.float("thickness"), Some(1.25));
    }

    #[test]
    fn unknown_and_mismatched_edits_are_rejected() {
        let mut group = glass_group();
        assert_eq!(
            group.set("nope", ParamValue::Float(1.0)),
            Err(PanelError::UnknownParam("nope".to_string()))
        );
        assert_eq!(
            group.set("thickness", ParamValue::Color("#000000".to_string())),
            Err(PanelError::TypeMismatch("thickness".to_string()))
        );
        // Rejected edits leave the old value in place.
        assert_eq!(group.float("thickness"), Some(0.2));
    }

    #[test]
    fn vec3_components_clamp_individually() {
        let mut group = ParamGroup::new("Camera")
            .with_param(
                "position",
                Param {
                    value: ParamValue::Vec3([4.0, 1.5, 5.0]),
                    min: Some(-10.0),
                    max: Some(10.0),
                    step: Some(0.1),
                },
            )
            .with_export("Save Camera", &[]);
        group
            .set("position", ParamValue::Vec3([20.0, 0.0, -20.0]))
            .unwrap();
        assert_eq!(group.vec3("position"), Some([10.0, 0.0, -10.0]));
    }

    #[test]
    fn export_strips_excluded_keys_and_round_trips() {
        let mut group = glass_group();
        group.export = Some(ExportAction {
            label: "Save Material".to_string(),
            exclude: vec!["roughness".to_string()],
        });
        let text = group.export_text().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        let object = parsed.as_object().unwrap();
        assert!(object.contains_key("thickness"));
        assert!(object.contains_key("color"));
        assert!(!object.contains_key("roughness"));
        assert!(!object.contains_key("Save Material"));
        assert_eq!(object["color"], serde_json::json!("#ffffff"));
        assert!((object["thickness"].as_f64().unwrap() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn export_keeps_declaration_order() {
        let text = glass_group().export_text().unwrap();
        let thickness = text.find("thickness").unwrap();
        let roughness = text.find("roughness").unwrap();
        let color = text.find("color").unwrap();
        assert!(thickness < roughness && roughness < color);
    }

    #[test]
    fn run_export_writes_to_the_sink() {
        let group = glass_group();
        let mut clipboard = MemoryClipboard::default();
        let text = group.run_export(&mut clipboard).unwrap();
        assert_eq!(clipboard.contents.as_deref(), Some(text.as_str()));
    }

    #[test]
    fn groups_without_an_action_refuse_to_export() {
        let group = ParamGroup::new("Ground Plane").with_param("roughness", Param::float(0.2));
        assert_eq!(group.export_text(), Err(PanelError::NoExportAction));
    }

    #[test]
    fn failing_clipboard_surfaces_the_error() {
        struct Broken;
        impl ClipboardSink for Broken {
            fn write_text(&mut self, _: &str) -> anyhow::Result<()> {
                anyhow::bail!("denied")
            }
        }
        let group = glass_group();
        assert!(group.run_export(&mut Broken).is_err());
    }
}
