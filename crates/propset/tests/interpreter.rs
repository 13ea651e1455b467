pub mod fixtures;

use fixtures::*;
use propset::prelude::*;

/// One element of a configuration document.
#[derive(Debug, Default)]
struct Element {
    name: &'static str,
    class: Option<&'static str>,
    text: Option<&'static str>,
    children: Vec<Element>,
}

fn text(name: &'static str, value: &'static str) -> Element {
    Element { name, text: Some(value), ..Element::default() }
}

fn nested(name: &'static str, children: Vec<Element>) -> Element {
    Element { name, children, ..Element::default() }
}

fn lookup_class(class: &str) -> Option<Component> {
    match class {
        "PatternLayout" => Some(Component::configurable(PatternLayout::default())),
        "HtmlLayout" => Some(Component::new(HtmlLayout)),
        "ThresholdFilter" => Some(Component::configurable(ThresholdFilter::default())),
        _ => None,
    }
}

/// Applies every child of `element` to `target`, recursing into nested objects.
fn configure(target: &mut dyn Introspect, element: &Element, statuses: &StatusManager) {
    let mut setter = PropertySetter::new(target, statuses);

    for child in &element.children {
        let aggregation = setter.compute_aggregation_type(child.name);
        match aggregation {
            AggregationType::NotFound => {
                statuses.add_status(Status::warn(
                    setter.type_name(),
                    format!("Ignoring unknown element <{}>", child.name),
                ));
            },
            AggregationType::AsBasicProperty => {
                let _ = setter.set_property(child.name, child.text);
            },
            AggregationType::AsBasicPropertyCollection => {
                let _ = setter.add_basic_property(child.name, child.text);
            },
            AggregationType::AsComplexProperty | AggregationType::AsComplexPropertyCollection => {
                let component = child
                    .class
                    .and_then(lookup_class)
                    .or_else(|| setter.instantiable_type(child.name, aggregation)?.instantiate())
                    .or_else(|| setter.default_class(child.name, aggregation)?.instantiate());
                let Some(mut component) = component else {
                    statuses.add_status(Status::error(
                        setter.type_name(),
                        format!("Could not create an object for <{}>", child.name),
                    ));
                    continue;
                };
                if let Some(nested) = component.as_introspect_mut() {
                    configure(nested, child, statuses);
                }
                let _ = if aggregation.is_collection() {
                    setter.add_complex_property(child.name, component)
                } else {
                    setter.set_complex_property(child.name, component)
                };
            },
        }
    }
}

fn document() -> Element {
    nested("logger", vec![
        text("level", "Chatty"),
        text("additive", "false"),
        nested("appender", vec![
            text("name", "console"),
            nested("layout", vec![text("pattern", "[%msg]")]),
            nested("filter", vec![text("level", "Quiet")]),
            nested("filter", vec![text("level", "Normal")]),
        ]),
        nested("appender", vec![
            text("name", "html"),
            Element { name: "layout", class: Some("HtmlLayout"), ..Element::default() },
        ]),
        text("appender_ref", "console"),
        text("appenderRef", "html"),
        text("colour", "blue"),
    ])
}

#[test]
fn document_configures_the_object_graph() {
    init_tracing();
    let mut logger = Logger { additive: true, ..Logger::default() };
    let statuses = StatusManager::new();

    configure(&mut logger, &document(), &statuses);

    assert_eq!(logger.level, Some(Verbosity::Chatty));
    assert!(!logger.additive);
    assert_eq!(logger.appender_refs, ["console", "html"]);
    assert_eq!(logger.appenders.len(), 2);

    let console = &logger.appenders[0];
    assert_eq!(console.name, "console");
    assert_eq!(console.layout.as_ref().unwrap().render("up"), "[up]");
    let levels: Vec<_> = console.filters.iter().map(|f| f.level).collect();
    assert_eq!(levels, [Some(Verbosity::Quiet), Some(Verbosity::Normal)]);

    let html = &logger.appenders[1];
    assert_eq!(html.layout.as_ref().unwrap().render("up"), "<p>up</p>");

    let recorded = statuses.statuses();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].message(), "Ignoring unknown element <colour>");
}

#[test]
fn bad_values_do_not_stop_the_pass() {
    let doc = nested("logger", vec![
        text("level", "Deafening"),
        nested("appender", vec![text("name", "file"), text("pair", "a=b")]),
        text("additive", "true"),
    ]);
    let mut logger = Logger::default();
    let statuses = StatusManager::new();

    configure(&mut logger, &doc, &statuses);

    assert_eq!(logger.level, None);
    assert!(logger.additive);
    assert_eq!(logger.appenders.len(), 1);
    assert_eq!(logger.appenders[0].name, "file");
    assert_eq!(statuses.len(), 2);
    assert_eq!(statuses.count(Level::Warn), 2);
}
