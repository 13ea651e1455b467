use propset::prelude::*;

#[derive(Debug, ConfigEnum)]
pub enum Target {
    Console,
    File(String),
}

fn main() {}
