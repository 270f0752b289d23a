//! In-memory and layered configuration adapters.
//!
//! Command-line flags and interactive answers are collected into a
//! [`MapConfigAdapter`] and stacked over the INI file with [`LayeredConfig`],
//! so one validation path serves every input source.

use std::collections::BTreeMap;

use crate::ports::config_port::ConfigPort;

#[derive(Debug, Clone, Default)]
pub struct MapConfigAdapter {
    values: BTreeMap<(String, String), String>,
}

impl MapConfigAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, section: &str, key: &str, value: impl Into<String>) {
        self.values
            .insert((section.to_lowercase(), key.to_lowercase()), value.into());
    }

    /// Set only when `value` is present.
    pub fn set_opt(&mut self, section: &str, key: &str, value: Option<impl Into<String>>) {
        if let Some(v) = value {
            self.set(section, key, v);
        }
    }

    pub fn with(mut self, section: &str, key: &str, value: impl Into<String>) -> Self {
        self.set(section, key, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ConfigPort for MapConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.values
            .get(&(section.to_lowercase(), key.to_lowercase()))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

/// Looks keys up in each layer in turn; earlier layers win.
#[derive(Default)]
pub struct LayeredConfig<'a> {
    layers: Vec<&'a dyn ConfigPort>,
}

impl<'a> LayeredConfig<'a> {
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    pub fn push(mut self, layer: &'a dyn ConfigPort) -> Self {
        self.layers.push(layer);
        self
    }
}

impl ConfigPort for LayeredConfig<'_> {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.layers
            .iter()
            .find_map(|layer| layer.get_string(section, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_lookup_is_case_insensitive() {
        let map = MapConfigAdapter::new().with("DCA", "Ticker", "SPY");
        assert_eq!(map.get_string("dca", "ticker"), Some("SPY".to_string()));
    }

    #[test]
    fn set_opt_skips_none() {
        let mut map = MapConfigAdapter::new();
        map.set_opt("dca", "ticker", None::<String>);
        assert!(map.is_empty());
        map.set_opt("dca", "ticker", Some("QQQ"));
        assert_eq!(map.get_string("dca", "ticker"), Some("QQQ".to_string()));
    }

    #[test]
    fn earlier_layers_win() {
        let flags = MapConfigAdapter::new().with("dca", "ticker", "MSFT");
        let file = MapConfigAdapter::new()
            .with("dca", "ticker", "AAPL")
            .with("dca", "amount", "100");
        let layered = LayeredConfig::new().push(&flags).push(&file);
        assert_eq!(layered.get_string("dca", "ticker"), Some("MSFT".to_string()));
        assert_eq!(layered.get_string("dca", "amount"), Some("100".to_string()));
        assert_eq!(layered.get_string("dca", "missing"), None);
    }

    #[test]
    fn blank_value_falls_through_to_next_layer() {
        let flags = MapConfigAdapter::new().with("dca", "ticker", "  ");
        let file = MapConfigAdapter::new().with("dca", "ticker", "AAPL");
        let layered = LayeredConfig::new().push(&flags).push(&file);
        assert_eq!(layered.get_string("dca", "ticker"), Some("AAPL".to_string()));
    }
}
