use propset::prelude::*;

pub trait Resettable {
    fn set_limit(&mut self, limit: u32);
}

#[derive(Debug, Default)]
pub struct Window {
    limit: u32,
}

#[configurable]
impl Resettable for Window {
    fn set_limit(&mut self, limit: u32) {
        self.limit = limit;
    }
}

fn main() {}
