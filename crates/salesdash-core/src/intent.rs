//! Question intent matcher
//!
//! Answers free-text questions about the current view by checking a fixed,
//! ordered list of rules. Each rule pairs a trigger (a regex or a set of
//! literal phrases) with a handler that computes the reply from the view.
//! The first rule whose trigger fires wins, so the order of [`RULES`] matters:
//! entity metrics and order lookups are tried before the phrase intents they
//! can overlap with.
//!
//! This is not a language model. Synonyms, typos, and compound questions are
//! not understood.

use regex::Regex;
use serde::Serialize;
use tracing::{debug, error};

use crate::aggregate::{
    count, distinct, find_by_exact, find_by_order_id, find_by_substring, has_order_ids, mean,
    status_counts, top_n, total,
};
use crate::dataset::{title_case, Dataset};
use crate::error::{Error, Result};
use crate::filter::{apply, FilterSpec, FilteredView};
use crate::format::Metric;
use crate::models::Field;

/// Prefix on every reply
pub const BOT_PREFIX: &str = "🤖 ";

/// A recognised question category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// `sales in <city|state|category>`, `orders for ...`, `count from ...`
    EntityMetric,
    /// `details for order <id>`, `status of order <id>`
    OrderLookup,
    TotalSales,
    OrderCount,
    AverageAmount,
    TopCategory,
    TopCity,
    TopState,
    StatusSummary,
    /// `count <status phrase> orders`
    StatusCount,
    Greeting,
    Farewell,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EntityMetric => "entity_metric",
            Self::OrderLookup => "order_lookup",
            Self::TotalSales => "total_sales",
            Self::OrderCount => "order_count",
            Self::AverageAmount => "average_amount",
            Self::TopCategory => "top_category",
            Self::TopCity => "top_city",
            Self::TopState => "top_state",
            Self::StatusSummary => "status_summary",
            Self::StatusCount => "status_count",
            Self::Greeting => "greeting",
            Self::Farewell => "farewell",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reply to one question
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    /// Matched intent, `None` for blank, no-data, and unrecognised questions
    pub intent: Option<Intent>,
    /// Markdown reply, always starting with [`BOT_PREFIX`]
    pub text: String,
}

impl Answer {
    fn new(intent: Option<Intent>, text: impl AsRef<str>) -> Self {
        Self {
            intent,
            text: format!("{}{}", BOT_PREFIX, text.as_ref()),
        }
    }
}

/// Data a handler may consult
pub struct AnswerContext<'v, 'a> {
    /// Records matching the active filters
    pub view: &'v FilteredView<'a>,
    /// The unfiltered dataset, to tell "filtered out" from "does not exist"
    pub dataset: &'v Dataset,
    /// `overall data` or `current filtered view`
    pub scope: &'v str,
}

/// Computes a reply from the trigger's capture groups
type Handler = fn(&[String], &AnswerContext<'_, '_>) -> Result<String>;

/// How a rule decides it applies
#[derive(Debug, Clone, Copy)]
enum TriggerSpec {
    /// Case-insensitive regex over the trimmed question; groups are passed on
    Pattern(&'static str),
    /// Any of these substrings of the lower-cased question
    AnyPhrase(&'static [&'static str]),
    /// All of `all` and one of `any` appear in the lower-cased question;
    /// `pattern` then supplies groups, or none if it does not match
    Gated {
        all: &'static [&'static str],
        any: &'static [&'static str],
        pattern: &'static str,
    },
}

/// Ordered dispatch table; the first matching rule answers
const RULES: &[(Intent, TriggerSpec, Handler)] = &[
    (
        Intent::EntityMetric,
        TriggerSpec::Pattern(r"(?i)(sales|orders|count)\s+(?:in|for|from)\s+([\w\s.-]+)"),
        entity_metric,
    ),
    (
        Intent::OrderLookup,
        TriggerSpec::Pattern(r"(?i)(details|info|status)\s+(?:for|of)\s+order\s+([\w\-/]+)"),
        order_lookup,
    ),
    (
        Intent::TotalSales,
        TriggerSpec::AnyPhrase(&["total sales", "total revenue"]),
        total_sales,
    ),
    (
        Intent::OrderCount,
        TriggerSpec::AnyPhrase(&["how many orders", "total orders", "order count"]),
        order_count,
    ),
    (
        Intent::AverageAmount,
        TriggerSpec::AnyPhrase(&["average amount", "average sales"]),
        average_amount,
    ),
    (
        Intent::TopCategory,
        TriggerSpec::AnyPhrase(&["top category"]),
        top_category,
    ),
    (Intent::TopCity, TriggerSpec::AnyPhrase(&["top city"]), top_city),
    (Intent::TopState, TriggerSpec::AnyPhrase(&["top state"]), top_state),
    (
        Intent::StatusSummary,
        TriggerSpec::AnyPhrase(&["status summary", "order status"]),
        status_summary,
    ),
    (
        Intent::StatusCount,
        TriggerSpec::Gated {
            all: &["count"],
            any: &["orders", "status"],
            pattern: r"(?i)count ([\w\s]+?)\s*(?:orders|status)",
        },
        status_count,
    ),
    (Intent::Greeting, TriggerSpec::AnyPhrase(&["hello", "hi"]), greeting),
    (Intent::Farewell, TriggerSpec::AnyPhrase(&["bye", "thanks"]), farewell),
];

/// Compiled trigger
enum Trigger {
    Pattern(Regex),
    AnyPhrase(&'static [&'static str]),
    Gated {
        all: &'static [&'static str],
        any: &'static [&'static str],
        pattern: Regex,
    },
}

impl Trigger {
    fn compile(spec: TriggerSpec) -> Result<Self> {
        Ok(match spec {
            TriggerSpec::Pattern(p) => Self::Pattern(Regex::new(p)?),
            TriggerSpec::AnyPhrase(phrases) => Self::AnyPhrase(phrases),
            TriggerSpec::Gated { all, any, pattern } => Self::Gated {
                all,
                any,
                pattern: Regex::new(pattern)?,
            },
        })
    }

    /// Capture groups if the trigger fires
    fn matches(&self, question: &str, lowered: &str) -> Option<Vec<String>> {
        match self {
            Self::Pattern(re) => re.captures(question).map(|caps| groups(&caps)),
            Self::AnyPhrase(phrases) => phrases
                .iter()
                .any(|p| lowered.contains(p))
                .then(Vec::new),
            Self::Gated { all, any, pattern } => {
                let gated = all.iter().all(|w| lowered.contains(w))
                    && any.iter().any(|w| lowered.contains(w));
                gated.then(|| {
                    pattern
                        .captures(question)
                        .map(|caps| groups(&caps))
                        .unwrap_or_default()
                })
            }
        }
    }
}

fn groups(caps: &regex::Captures<'_>) -> Vec<String> {
    caps.iter()
        .skip(1)
        .map(|m| m.map(|m| m.as_str().to_string()).unwrap_or_default())
        .collect()
}

struct IntentRule {
    intent: Intent,
    trigger: Trigger,
    handler: Handler,
}

/// Ordered rule set answering questions about a filtered view
///
/// Built once at startup and shared read-only.
pub struct IntentMatcher {
    rules: Vec<IntentRule>,
}

impl IntentMatcher {
    /// Compile the rule table
    pub fn new() -> Result<Self> {
        let rules = RULES
            .iter()
            .map(|&(intent, spec, handler)| {
                Ok(IntentRule {
                    intent,
                    trigger: Trigger::compile(spec)?,
                    handler,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Intents in dispatch order
    pub fn intents(&self) -> impl Iterator<Item = Intent> + '_ {
        self.rules.iter().map(|r| r.intent)
    }

    /// Which intent a question dispatches to, ignoring the data
    pub fn classify(&self, question: &str) -> Option<Intent> {
        let question = question.trim();
        if question.is_empty() {
            return None;
        }
        let lowered = question.to_lowercase();
        self.rules
            .iter()
            .find(|r| r.trigger.matches(question, &lowered).is_some())
            .map(|r| r.intent)
    }

    /// Answer `question` against `dataset` restricted by `spec`
    ///
    /// The view is re-derived here with the same filter the dashboard uses.
    pub fn ask(&self, question: &str, dataset: &Dataset, spec: &FilterSpec) -> Answer {
        let view = apply(dataset, spec);
        self.respond(question, &view, dataset, spec.describe())
    }

    /// Reply text only
    pub fn answer(
        &self,
        question: &str,
        view: &FilteredView<'_>,
        dataset: &Dataset,
        scope: &str,
    ) -> String {
        self.respond(question, view, dataset, scope).text
    }

    /// Reply with the matched intent
    pub fn respond(
        &self,
        question: &str,
        view: &FilteredView<'_>,
        dataset: &Dataset,
        scope: &str,
    ) -> Answer {
        let question = question.trim();
        if question.is_empty() {
            return Answer::new(None, "Please ask a question about the current data view.");
        }

        if view.is_empty() {
            return Answer::new(
                None,
                format!(
                    "📉 No data found for the {}. Please broaden your filters.",
                    scope
                ),
            );
        }

        let lowered = question.to_lowercase();
        let ctx = AnswerContext {
            view,
            dataset,
            scope,
        };

        for rule in &self.rules {
            let Some(groups) = rule.trigger.matches(question, &lowered) else {
                continue;
            };

            debug!(intent = rule.intent.as_str(), "Matched question intent");
            let text = match (rule.handler)(&groups, &ctx) {
                Ok(text) => text,
                Err(e) => {
                    error!(intent = rule.intent.as_str(), error = %e, "Question analysis failed");
                    format!(
                        "Oops! Something went wrong while analyzing the {}. Please check the data or try a different question.",
                        scope
                    )
                }
            };
            return Answer::new(Some(rule.intent), text);
        }

        debug!("No intent matched question");
        Answer::new(None, not_understood(scope))
    }
}

fn not_understood(scope: &str) -> String {
    format!(
        "🤔 I'm not sure how to interpret that for the {}. Try asking about totals, averages, tops, counts, or specifics like 'sales in Mumbai' or 'details for order 123-456'.",
        scope
    )
}

fn group<'g>(groups: &'g [String], i: usize, intent: Intent) -> Result<&'g str> {
    groups
        .get(i)
        .map(|g| g.trim())
        .ok_or_else(|| Error::Analysis(format!("{} pattern missing group {}", intent, i)))
}

/// Capitalise the first letter of a metric word
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ============================================================================
// Handlers
// ============================================================================

fn entity_metric(groups: &[String], ctx: &AnswerContext<'_, '_>) -> Result<String> {
    let metric_word = group(groups, 0, Intent::EntityMetric)?.to_lowercase();
    let entity = group(groups, 1, Intent::EntityMetric)?;

    if entity.is_empty() {
        return Ok(entity_not_found(entity, ctx.scope));
    }

    let entity_title = title_case(entity);

    // City, then state, then category substring; the first dimension that matches wins
    let (icon, label, subset) = {
        let cities = find_by_exact(ctx.view, Field::RegionCity, &entity_title);
        if !cities.is_empty() {
            ("🏙️", format!("city **{}**", entity_title), cities)
        } else {
            let states = find_by_exact(ctx.view, Field::RegionState, &entity_title);
            if !states.is_empty() {
                ("📍", format!("state **{}**", entity_title), states)
            } else {
                let categories = find_by_substring(ctx.view, Field::Category, entity);
                if categories.is_empty() {
                    return Ok(entity_not_found(entity, ctx.scope));
                }
                let names = distinct(&categories, Field::Category);
                let display = match names.as_slice() {
                    [only] => only.clone(),
                    _ => format!("categories matching '{}'", entity),
                };
                ("📂", format!("**{}**", display), categories)
            }
        }
    };

    let metric = if metric_word == "sales" {
        Metric::Currency(total(&subset))
    } else {
        Metric::Count(count(&subset))
    };

    Ok(format!(
        "{} {} for {} in the {}: **{}**.",
        icon,
        capitalize(&metric_word),
        label,
        ctx.scope,
        metric
    ))
}

fn entity_not_found(entity: &str, scope: &str) -> String {
    format!(
        "❓ Could not find '{}' as a city, state, or category in the {}.",
        entity, scope
    )
}

fn order_lookup(groups: &[String], ctx: &AnswerContext<'_, '_>) -> Result<String> {
    let action = group(groups, 0, Intent::OrderLookup)?.to_lowercase();
    let order_id = group(groups, 1, Intent::OrderLookup)?;

    if !has_order_ids(&ctx.dataset.view()) {
        return Ok("❗ Cannot look up orders as 'Order ID' column is missing.".to_string());
    }

    let Some(order) = find_by_order_id(ctx.view, order_id) else {
        let exists = find_by_order_id(&ctx.dataset.view(), order_id).is_some();
        return Ok(if exists {
            format!(
                "🚫 Order **{}** exists but is not in the {}. Try removing filters.",
                order_id, ctx.scope
            )
        } else {
            format!("🚫 Order ID **{}** not found in the dataset.", order_id)
        });
    };

    if action == "status" {
        return Ok(format!(
            "🏷️ Status for order **{}** in the {}: **{}**.",
            order_id, ctx.scope, order.status
        ));
    }

    let details = [
        format!(
            "📋 Details for Order ID **{}** (found in the {}):",
            order_id, ctx.scope
        ),
        format!("- **Date:** {}", order.date.format("%Y-%m-%d")),
        format!("- **Status:** {}", order.status),
        format!("- **Amount:** {}", Metric::Currency(order.amount)),
        format!("- **Category:** {}", order.category),
        format!("- **Ship to City:** {}", order.region_city),
        format!("- **Ship to State:** {}", order.region_state),
    ];
    Ok(details.join("\n"))
}

fn total_sales(_: &[String], ctx: &AnswerContext<'_, '_>) -> Result<String> {
    Ok(format!(
        "📊 Total sales for the {}: **{}**.",
        ctx.scope,
        Metric::Currency(total(ctx.view))
    ))
}

fn order_count(_: &[String], ctx: &AnswerContext<'_, '_>) -> Result<String> {
    Ok(format!(
        "🔢 Orders in the {}: **{}**.",
        ctx.scope,
        Metric::Count(count(ctx.view))
    ))
}

fn average_amount(_: &[String], ctx: &AnswerContext<'_, '_>) -> Result<String> {
    Ok(match mean(ctx.view) {
        Some(avg) => format!(
            "⚖️ Average order amount for the {}: **{}**.",
            ctx.scope,
            Metric::Currency(avg)
        ),
        None => format!("📉 Cannot calculate average for the {}.", ctx.scope),
    })
}

fn top_group(ctx: &AnswerContext<'_, '_>, field: Field, label: &str, icon: &str) -> String {
    match top_n(ctx.view, field, 1).first() {
        Some(top) => format!(
            "{} Top {} (by sales) in the {}: **{} ({})**.",
            icon,
            label,
            ctx.scope,
            top.key,
            Metric::Currency(top.amount)
        ),
        None => format!("❓ Cannot determine top {} for the {}.", label, ctx.scope),
    }
}

fn top_category(_: &[String], ctx: &AnswerContext<'_, '_>) -> Result<String> {
    Ok(top_group(ctx, Field::Category, "category", "🏆"))
}

fn top_city(_: &[String], ctx: &AnswerContext<'_, '_>) -> Result<String> {
    Ok(top_group(ctx, Field::RegionCity, "city", "🏙️"))
}

fn top_state(_: &[String], ctx: &AnswerContext<'_, '_>) -> Result<String> {
    Ok(top_group(ctx, Field::RegionState, "state", "📍"))
}

fn status_summary(_: &[String], ctx: &AnswerContext<'_, '_>) -> Result<String> {
    let counts = status_counts(ctx.view);
    if counts.is_empty() {
        return Ok(format!("❓ No status info for the {}.", ctx.scope));
    }

    let mut lines = vec![format!("📋 Status summary for the {}:", ctx.scope)];
    lines.extend(
        counts
            .iter()
            .map(|c| format!("- **{}:** {} orders", c.status, Metric::Count(c.count))),
    );
    Ok(lines.join("\n"))
}

fn status_count(groups: &[String], ctx: &AnswerContext<'_, '_>) -> Result<String> {
    // Gate passed but the phrase pattern did not match
    if groups.is_empty() {
        return Ok(not_understood(ctx.scope));
    }

    let phrase = group(groups, 0, Intent::StatusCount)?;
    let matching = find_by_substring(ctx.view, Field::Status, phrase);
    Ok(format!(
        "🔢 Found **{}** orders with status containing '{}' in the {}.",
        Metric::Count(matching.len()),
        phrase,
        ctx.scope
    ))
}

fn greeting(_: &[String], ctx: &AnswerContext<'_, '_>) -> Result<String> {
    Ok(format!(
        "👋 Hello! I can analyze the {}. What would you like to know?",
        ctx.scope
    ))
}

fn farewell(_: &[String], _: &AnswerContext<'_, '_>) -> Result<String> {
    Ok("👍 Happy to help analyze!".to_string())
}
