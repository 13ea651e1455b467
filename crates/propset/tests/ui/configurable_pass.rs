use propset::prelude::*;

#[derive(Debug, Default)]
pub struct Rolling {
    max_history: u32,
    patterns: Vec<String>,
    total: Option<FileSize>,
}

#[configurable(instantiable)]
impl Rolling {
    pub fn set_max_history(&mut self, max_history: u32) {
        self.max_history = max_history;
    }

    pub fn set_total_size_cap(&mut self, total: FileSize) -> Result<(), String> {
        if total.bytes() == 0 {
            return Err("cap must be positive".to_owned());
        }
        self.total = Some(total);
        Ok(())
    }

    pub fn add_pattern(&mut self, pattern: String) {
        self.patterns.push(pattern);
    }

    pub fn set_window(&mut self, min: u32, max: u32) {
        self.max_history = max - min;
    }

    pub fn get_max_history(&self) -> u32 {
        self.max_history
    }

    pub fn is_capped(&self) -> bool {
        self.total.is_some()
    }

    fn reset(&mut self) {
        self.patterns.clear();
    }
}

fn main() {
    let rolling = Rolling::default();
    let caps = rolling.introspect().unwrap();
    assert!(caps.property("maxHistory").is_some());
    assert!(caps.property("capped").is_some());
    assert!(caps.method("addPattern").is_some());
    assert!(<Rolling as Parameter>::param_type().is_instantiable());
}
