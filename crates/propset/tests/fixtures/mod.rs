#![allow(dead_code, unreachable_pub, non_snake_case)]

use propset::prelude::*;
use std::fmt;
use std::path::PathBuf;

/// Routes binder events to the test writer; safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ConfigEnum)]
pub enum Verbosity {
    Quiet,
    Normal,
    Chatty,
}

#[derive(Debug, Default)]
pub struct Person {
    pub name: String,
    pub age: i32,
    pub male: bool,
    pub weight: f64,
    pub initial: Option<char>,
    pub verbosity: Option<Verbosity>,
    pub quota: FileSize,
    pub timeout: ConfigDuration,
    pub port: u16,
    pub max_history: u32,
    pub url: String,
    pub range: (u32, u32),
    pub home: PathBuf,
}

#[configurable]
impl Person {
    pub fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub fn set_age(&mut self, age: i32) {
        self.age = age;
    }

    pub fn set_male(&mut self, male: bool) {
        self.male = male;
    }

    pub fn set_weight(&mut self, weight: f64) {
        self.weight = weight;
    }

    pub fn set_initial(&mut self, initial: char) {
        self.initial = Some(initial);
    }

    pub fn set_verbosity(&mut self, verbosity: Verbosity) {
        self.verbosity = Some(verbosity);
    }

    pub fn set_quota(&mut self, quota: FileSize) {
        self.quota = quota;
    }

    pub fn set_timeout(&mut self, timeout: ConfigDuration) {
        self.timeout = timeout;
    }

    pub fn set_port(&mut self, port: u16) -> Result<(), &'static str> {
        if port == 0 {
            return Err("port 0 is reserved");
        }
        self.port = port;
        Ok(())
    }

    pub fn set_max_history(&mut self, max_history: u32) {
        self.max_history = max_history;
    }

    pub fn set_URL(&mut self, url: String) {
        self.url = url;
    }

    pub fn set_home(&mut self, home: PathBuf) {
        self.home = home;
    }

    pub fn set_range(&mut self, low: u32, high: u32) {
        self.range = (low, high);
    }

    pub fn get_id(&self) -> u32 {
        7
    }
}

#[derive(Debug, Default)]
pub struct Bag {
    pub items: Vec<String>,
    pub counts: Vec<u32>,
    pub tags: Vec<String>,
    pub tag: Option<String>,
}

#[configurable]
impl Bag {
    pub fn add_item(&mut self, item: String) {
        self.items.push(item);
    }

    pub fn add_count(&mut self, count: u32) {
        self.counts.push(count);
    }

    pub fn add_tag(&mut self, tag: String) {
        self.tags.push(tag);
    }

    pub fn set_tag(&mut self, tag: String) {
        self.tag = Some(tag);
    }
}

pub trait Layout: fmt::Debug {
    fn render(&self, message: &str) -> String;
}

#[derive(Debug, Default)]
pub struct PatternLayout {
    pub pattern: String,
}

#[configurable(instantiable)]
impl PatternLayout {
    pub fn set_pattern(&mut self, pattern: String) {
        self.pattern = pattern;
    }
}

impl Layout for PatternLayout {
    fn render(&self, message: &str) -> String {
        self.pattern.replace("%msg", message)
    }
}

#[derive(Debug, Default)]
pub struct HtmlLayout;

impl Layout for HtmlLayout {
    fn render(&self, message: &str) -> String {
        format!("<p>{message}</p>")
    }
}

propset::abstract_parameter!(dyn Layout => [PatternLayout, HtmlLayout]);

#[derive(Debug, Default)]
pub struct ThresholdFilter {
    pub level: Option<Verbosity>,
}

#[configurable(instantiable)]
impl ThresholdFilter {
    pub fn set_level(&mut self, level: Verbosity) {
        self.level = Some(level);
    }
}

#[derive(Debug, Default)]
pub struct Appender {
    pub name: String,
    pub layout: Option<Box<dyn Layout>>,
    pub filters: Vec<ThresholdFilter>,
    pub pairs: Vec<(String, String)>,
}

#[configurable(instantiable)]
impl Appender {
    pub fn set_name(&mut self, name: String) {
        self.name = name;
    }

    #[default_class(PatternLayout)]
    pub fn set_layout(&mut self, layout: Box<dyn Layout>) {
        self.layout = Some(layout);
    }

    pub fn add_filter(&mut self, filter: ThresholdFilter) {
        self.filters.push(filter);
    }

    pub fn add_pair(&mut self, key: String, value: String) {
        self.pairs.push((key, value));
    }
}

#[derive(Debug, Default)]
pub struct Logger {
    pub level: Option<Verbosity>,
    pub additive: bool,
    pub appenders: Vec<Appender>,
    pub appender_refs: Vec<String>,
}

#[configurable]
impl Logger {
    pub fn set_level(&mut self, level: Verbosity) {
        self.level = Some(level);
    }

    pub fn set_additive(&mut self, additive: bool) {
        self.additive = additive;
    }

    pub fn add_appender(&mut self, appender: Appender) {
        self.appenders.push(appender);
    }

    pub fn add_appender_ref(&mut self, name: String) {
        self.appender_refs.push(name);
    }
}

#[derive(Debug, Default)]
pub struct Chart {
    pub x_axis: String,
    pub x_labels: Vec<String>,
}

#[configurable]
impl Chart {
    pub fn set_x_axis(&mut self, axis: String) {
        self.x_axis = axis;
    }

    pub fn add_x_label(&mut self, label: String) {
        self.x_labels.push(label);
    }
}
