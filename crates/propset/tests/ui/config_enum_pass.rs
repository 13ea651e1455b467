use propset::coercion::{FromConfigStr, TypeCategory, convert};
use propset::ConfigEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ConfigEnum)]
pub enum Target {
    SystemOut,
    SystemErr,
}

fn main() {
    assert_eq!(Target::CATEGORY, TypeCategory::Enumeration);
    assert_eq!(convert::<Target>("SystemErr").unwrap(), Some(Target::SystemErr));
    assert!(convert::<Target>("systemerr").is_err());
}
