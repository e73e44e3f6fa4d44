//! The bundled 10-class taxonomy.
//!
//! Declaration order is load-bearing: classification picks the first matching
//! class, so reordering this table changes results.

use super::{TaxonomyClass, TaxonomyDefinition};

struct ClassSpec {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    color: &'static str,
    keywords: &'static [&'static str],
    patterns: &'static [&'static str],
}

const DEFAULT_CLASSES: &[ClassSpec] = &[
    ClassSpec {
        id: "time-period",
        name: "Time Period",
        description: "Temporal boundaries and timeframes (quarters, years, deadlines)",
        color: "#FFC0CB",
        keywords: &[
            "quarter", "year", "month", "week", "deadline", "timeline", "period", "fiscal",
            "H1", "H2", "Q1", "Q2", "Q3", "Q4", "last quarter",
        ],
        patterns: &[
            r"\d{4}", r"Q[1-4]", r"H[12]", r"last \w+", r"next \w+", r"this \w+", r"\w+ quarter",
        ],
    },
    ClassSpec {
        id: "cycle-theme",
        name: "Cycle Theme",
        description: "Recurring themes and seasonal focuses across time periods",
        color: "#000000",
        keywords: &["growth", "expansion", "focus", "theme", "cycle", "seasonal", "efforts", "push"],
        patterns: &[r"\w+ efforts", r"\w+ focus", r"\w+ theme", r"\w+ cycle"],
    },
    ClassSpec {
        id: "initiative",
        name: "Initiative",
        description: "Strategic programs, projects, and organized efforts",
        color: "#ADD8E6",
        keywords: &[
            "improving", "initiative", "effort", "campaign", "program", "project",
            r"improving the \w+",
        ],
        patterns: &[r"improving \w+", r"initiative to \w+", r"effort to \w+", r"program for \w+"],
    },
    ClassSpec {
        id: "product-capability",
        name: "Product Capability",
        description: "Features, tools, and functional capabilities of the product",
        color: "#6A5ACD",
        keywords: &[
            "AI-powered", "insights", "feature", "capability", "functionality", "tool", "platform",
        ],
        patterns: &[r"AI-powered \w+", r"\w+ feature", r"\w+ capability", r"\w+ functionality"],
    },
    ClassSpec {
        id: "release-launch",
        name: "Release Launch",
        description: "Product releases, deployments, and launch activities",
        color: "#E6E6FA",
        keywords: &["rollout", "launch", "release", "deployment", "go-live", "ship"],
        patterns: &[r"rollout of \w+", r"launch of \w+", r"release of \w+", r"deployment of \w+"],
    },
    ClassSpec {
        id: "customer-segment",
        name: "Customer Segment",
        description: "Target audiences, customer groups, and market segments",
        color: "#FFFF00",
        keywords: &[
            "customers", "users", "segment", "market", "audience", "B2B", "SaaS", "enterprise",
            "mid-sized",
        ],
        patterns: &[r"customers in \w+", r"\w+ customers", r"\w+ users", r"\w+ segment"],
    },
    ClassSpec {
        id: "insight",
        name: "Insight",
        description: "Key learnings, discoveries, and understanding gained",
        color: "#98FB98",
        keywords: &[
            "see value", "insight", "learning", "discovery", "understanding", "realize", "quickly",
        ],
        patterns: &[r"see \w+ quickly", r"insight into \w+", r"learned that \w+", r"discovered \w+"],
    },
    ClassSpec {
        id: "goal",
        name: "Goal",
        description: "Objectives, targets, and desired outcomes to achieve",
        color: "#00FF00",
        keywords: &["reduce", "goal", "objective", "target", "aim", "resolve tickets", "time to"],
        patterns: &[
            r"reduce \w+", r"goal to \w+", r"objective to \w+", r"aim to \w+", r"reduce the time",
        ],
    },
    ClassSpec {
        id: "target",
        name: "Target",
        description: "Specific measurable targets and metrics to hit",
        color: "#FF7F50",
        keywords: &["reduction", "churn", "target", "metric", "KPI", "achieve", "hit"],
        patterns: &[r"reduction in \w+", r"target of \w+", r"achieve \w+", r"hit \w+"],
    },
    ClassSpec {
        id: "principle",
        name: "Principle",
        description: "Guiding values, beliefs, and methodological approaches",
        color: "#FFFFE0",
        keywords: &[
            "iterate", "validate", "principle", "approach", "methodology", "belief", "value",
        ],
        patterns: &[r"iterate and \w+", r"validate \w+", r"principle of \w+", r"approach to \w+"],
    },
];

/// Definition of the bundled taxonomy.
pub fn default_definition() -> TaxonomyDefinition {
    TaxonomyDefinition {
        id: "dotwork-default".into(),
        name: "Dotwork Default Taxonomy".into(),
        version: "1.0.0".into(),
        description: "Default 10-class taxonomy for narrative-to-ontology transformation".into(),
        classes: DEFAULT_CLASSES
            .iter()
            .map(|spec| TaxonomyClass {
                id: spec.id.into(),
                name: spec.name.into(),
                description: spec.description.into(),
                color: Some(spec.color.into()),
                keywords: spec.keywords.iter().map(|k| k.to_string()).collect(),
                patterns: spec.patterns.iter().map(|p| p.to_string()).collect(),
                parent: None,
            })
            .collect(),
    }
}
