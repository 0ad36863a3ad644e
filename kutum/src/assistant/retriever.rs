use crate::models::Member;

const NAME_MATCH_SCORE: u32 = 10;
const RELATION_MATCH_SCORE: u32 = 5;
const KEYWORD_MATCH_SCORE: u32 = 1;

/// A member paired with its relevance to the current query.
#[derive(Debug, Clone, Copy)]
struct ScoredMatch<'a> {
    score: u32,
    member: &'a Member,
}

/// Keyword scorer that picks the family members a question is about.
#[derive(Debug, Clone)]
pub struct KeywordRetriever {
    max_results: usize,
}

impl KeywordRetriever {
    pub fn new(max_results: usize) -> Self {
        Self { max_results }
    }

    /// Rank `members` against `query`, most relevant first.
    ///
    /// Members scoring zero are left out and at most `max_results` are kept.
    /// Equal scores keep their input order.
    pub fn rank(&self, query: &str, members: &[Member]) -> Vec<Member> {
        if query.trim().is_empty() || members.is_empty() {
            return Vec::new();
        }

        let query_lower = query.to_lowercase();
        let keywords: Vec<&str> = query_lower.split_whitespace().collect();

        let mut matches: Vec<ScoredMatch<'_>> = members
            .iter()
            .map(|member| ScoredMatch {
                score: score_member(&query_lower, &keywords, member),
                member,
            })
            .filter(|m| m.score > 0)
            .collect();

        // `sort_by` is stable, which is what gives ties their input order.
        matches.sort_by(|a, b| b.score.cmp(&a.score));

        tracing::debug!(
            candidates = members.len(),
            matched = matches.len(),
            "Ranked family members"
        );

        matches
            .into_iter()
            .take(self.max_results)
            .map(|m| m.member.clone())
            .collect()
    }
}

impl Default for KeywordRetriever {
    fn default() -> Self {
        Self::new(5)
    }
}

fn score_member(query_lower: &str, keywords: &[&str], member: &Member) -> u32 {
    let mut score = 0;

    let name = member.name.to_lowercase();
    if !name.is_empty() && query_lower.contains(&name) {
        score += NAME_MATCH_SCORE;
    }

    let relation = member.relation.to_lowercase();
    if !relation.is_empty() && query_lower.contains(&relation) {
        score += RELATION_MATCH_SCORE;
    }

    let text = member.searchable_text().to_lowercase();
    let keyword_hits = keywords.iter().filter(|k| text.contains(**k)).count() as u32;

    score + keyword_hits * KEYWORD_MATCH_SCORE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(name: &str, relation: &str, age: &str) -> Member {
        Member::new(name.to_lowercase(), name, relation, age)
    }

    fn names(members: &[Member]) -> Vec<&str> {
        members.iter().map(|m| m.name.as_str()).collect()
    }

    fn family() -> Vec<Member> {
        vec![
            member("Raj", "Son", "12"),
            member("Mina", "Daughter", "8"),
            member("Asha", "Wife", "38"),
            member("Vikram", "Father", "67"),
        ]
    }

    #[test]
    fn test_empty_query_returns_nothing() {
        let retriever = KeywordRetriever::default();
        assert!(retriever.rank("", &family()).is_empty());
        assert!(retriever.rank("   ", &family()).is_empty());
    }

    #[test]
    fn test_no_members_returns_nothing() {
        let retriever = KeywordRetriever::default();
        assert!(retriever.rank("who is Raj", &[]).is_empty());
    }

    #[test]
    fn test_name_mention_ranks_first() {
        let retriever = KeywordRetriever::default();
        let ranked = retriever.rank("What is Mina's blood group?", &family());
        assert_eq!(ranked.first().map(|m| m.name.as_str()), Some("Mina"));
    }

    #[test]
    fn test_relation_mention_scores() {
        let retriever = KeywordRetriever::default();
        let ranked = retriever.rank("tell me about my father", &family());
        assert_eq!(ranked.first().map(|m| m.name.as_str()), Some("Vikram"));
    }

    #[test]
    fn test_sons_scenario_ranks_son_above_daughter() {
        let retriever = KeywordRetriever::default();
        let members = vec![member("Raj", "Son", "12"), member("Mina", "Daughter", "8")];

        let ranked = retriever.rank("How many sons do I have?", &members);
        assert_eq!(ranked.first().map(|m| m.name.as_str()), Some("Raj"));
    }

    #[test]
    fn test_zero_scores_are_excluded() {
        let retriever = KeywordRetriever::default();
        let members = vec![member("Raj", "Son", "12")];
        assert!(retriever.rank("xyz", &members).is_empty());
    }

    #[test]
    fn test_ties_keep_input_order() {
        let retriever = KeywordRetriever::default();
        let members = vec![
            member("Zed", "Cousin", "30"),
            member("Amy", "Cousin", "30"),
            member("Bob", "Cousin", "30"),
        ];

        let ranked = retriever.rank("cousin", &members);
        assert_eq!(names(&ranked), vec!["Zed", "Amy", "Bob"]);
    }

    #[test]
    fn test_results_are_capped_and_sorted() {
        let retriever = KeywordRetriever::new(5);
        let members: Vec<Member> = (0..8)
            .map(|i| member(&format!("Kid{i}"), "Son", "10"))
            .chain(std::iter::once(member("Raj", "Son", "12")))
            .collect();

        let ranked = retriever.rank("is raj my son", &members);
        assert_eq!(ranked.len(), 5);
        assert_eq!(ranked[0].name, "Raj");
        assert_eq!(names(&ranked[1..]), vec!["Kid0", "Kid1", "Kid2", "Kid3"]);
    }

    #[test]
    fn test_empty_relation_does_not_match_everything() {
        let retriever = KeywordRetriever::default();
        let members = vec![member("Raj", "", "12")];
        assert!(retriever.rank("zzz", &members).is_empty());
    }

    #[test]
    fn test_score_components() {
        let raj = member("Raj", "Son", "12");
        let query = "raj son";
        let keywords: Vec<&str> = query.split_whitespace().collect();

        // name +10, relation +5, both keywords hit the searchable text
        assert_eq!(score_member(query, &keywords, &raj), 17);
    }
}
