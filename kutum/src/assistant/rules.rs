//! Deterministic answers built straight from the ranked members.
//!
//! Used whenever no LLM is configured or the LLM call fails. The query is
//! matched against a fixed list of intents; the first one that matches
//! produces the answer.

use crate::models::Member;

pub const NO_MATCH_RESPONSE: &str =
    "I couldn't find any family members matching your query. Could you please rephrase your question?";

const COUNT_PHRASES: &[&str] = &["how many", "count", "number of"];

/// A per-member attribute question ("what is everyone's height").
struct AttributeIntent {
    triggers: &'static [&'static str],
    heading: &'static str,
    empty: &'static str,
    value: fn(&Member) -> Option<&str>,
}

const ATTRIBUTE_INTENTS: &[AttributeIntent] = &[
    AttributeIntent {
        triggers: &["blood"],
        heading: "Blood group information:",
        empty: "No blood group information available for these members.",
        value: blood_group,
    },
    AttributeIntent {
        triggers: &["age", "old"],
        heading: "Age information:",
        empty: "No age information available.",
        value: age,
    },
    AttributeIntent {
        triggers: &["height"],
        heading: "Height information:",
        empty: "No height information available.",
        value: height,
    },
    AttributeIntent {
        triggers: &["weight"],
        heading: "Weight information:",
        empty: "No weight information available.",
        value: weight,
    },
    AttributeIntent {
        triggers: &["birthday", "birth", "born"],
        heading: "Date of birth information:",
        empty: "No date of birth information available.",
        value: date_of_birth,
    },
    AttributeIntent {
        triggers: &["gender"],
        heading: "Gender information:",
        empty: "No gender information available.",
        value: gender,
    },
];

fn blood_group(m: &Member) -> Option<&str> {
    m.blood_group.as_deref()
}

fn age(m: &Member) -> Option<&str> {
    Some(m.age.as_str())
}

fn height(m: &Member) -> Option<&str> {
    m.height.as_deref()
}

fn weight(m: &Member) -> Option<&str> {
    m.weight.as_deref()
}

fn date_of_birth(m: &Member) -> Option<&str> {
    m.date_of_birth.as_deref()
}

fn gender(m: &Member) -> Option<&str> {
    m.gender.as_deref()
}

/// Answer `query` from `members` without any model call.
///
/// Never returns an empty string.
pub fn generate_rule_based(query: &str, members: &[Member]) -> String {
    if members.is_empty() {
        return NO_MATCH_RESPONSE.to_string();
    }

    let query_lower = query.to_lowercase();

    if COUNT_PHRASES.iter().any(|p| query_lower.contains(p)) {
        return count_answer(&query_lower, members);
    }

    if let Some(intent) = ATTRIBUTE_INTENTS
        .iter()
        .find(|intent| intent.triggers.iter().any(|t| query_lower.contains(t)))
    {
        return attribute_answer(intent, members);
    }

    match members {
        [member] => member_profile(member),
        _ => member_list(members),
    }
}

fn count_answer(query_lower: &str, members: &[Member]) -> String {
    if query_lower.contains("son") {
        let sons = with_relations(members, &["Son"]);
        format!("You have {} son(s): {}", sons.len(), sons.join(", "))
    } else if query_lower.contains("daughter") {
        let daughters = with_relations(members, &["Daughter"]);
        format!(
            "You have {} daughter(s): {}",
            daughters.len(),
            daughters.join(", ")
        )
    } else if query_lower.contains("children") || query_lower.contains("kids") {
        let children = with_relations(members, &["Son", "Daughter"]);
        format!(
            "You have {} children: {}",
            children.len(),
            children.join(", ")
        )
    } else {
        format!("You have {} family members in total.", members.len())
    }
}

fn with_relations<'a>(members: &'a [Member], relations: &[&str]) -> Vec<&'a str> {
    members
        .iter()
        .filter(|m| relations.iter().any(|r| m.has_relation(r)))
        .map(|m| m.name.as_str())
        .collect()
}

fn attribute_answer(intent: &AttributeIntent, members: &[Member]) -> String {
    let lines: Vec<String> = members
        .iter()
        .filter_map(|m| {
            (intent.value)(m)
                .filter(|v| !v.is_empty())
                .map(|v| format!("{} ({}): {v}", m.name, m.relation))
        })
        .collect();

    if lines.is_empty() {
        intent.empty.to_string()
    } else {
        format!("{}\n{}", intent.heading, lines.join("\n"))
    }
}

fn member_profile(member: &Member) -> String {
    let mut info = vec![
        format!("Here's information about {}:", member.name),
        format!("Relation: {}", member.relation),
        format!("Age: {}", member.age),
    ];
    info.extend(
        member
            .optional_fields()
            .into_iter()
            .map(|(label, value)| format!("{label}: {value}")),
    );
    info.join("\n")
}

fn member_list(members: &[Member]) -> String {
    let lines: Vec<String> = members
        .iter()
        .map(|m| format!("• {} ({}, {})", m.name, m.relation, m.age))
        .collect();

    format!(
        "I found {} family members matching your query:\n{}",
        members.len(),
        lines.join("\n")
    )
}
