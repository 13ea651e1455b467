use propset::prelude::*;

#[derive(Debug, Default)]
pub struct Encoder {
    pattern: String,
}

#[configurable]
impl Encoder {
    #[default_class(String)]
    pub fn get_pattern(&self) -> String {
        self.pattern.clone()
    }
}

fn main() {}
