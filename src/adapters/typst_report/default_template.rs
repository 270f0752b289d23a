//! Built-in Typst report template.
//!
//! Placeholders resolved by [`super::resolve`]:
//! `{{RUN_SUMMARY}}`, `{{CADENCE_TABLE}}`, `{{CHART_SVG}}`, `{{LEDGER_TABLES}}`.

const DEFAULT_TEMPLATE: &str = r#"#set page(paper: "a4", flipped: true, margin: 1.5cm)
#set text(size: 10pt)

= Dollar Cost Averaging Report

== Run Parameters

{{RUN_SUMMARY}}

== Results by Cadence

{{CADENCE_TABLE}}

== Portfolio Value vs. Total Investment

{{CHART_SVG}}

#pagebreak()

{{LEDGER_TABLES}}
"#;

pub fn template() -> &'static str {
    DEFAULT_TEMPLATE
}
