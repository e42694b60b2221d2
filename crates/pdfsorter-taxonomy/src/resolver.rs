//! Batch-global taxonomy resolution

use crate::error::TaxonomyError;
use crate::normalize::{normalize_topic, sanitize_folder_name};
use crate::policy::TaxonomyPolicy;
use crate::similarity::{contains_with_ratio, similarity};
use pdfsorter_domain::{Assignment, Judgment, Taxonomy, TaxonomyFolder};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

/// Taxonomy plus one assignment per judgment, in input order
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Resolved folders
    pub taxonomy: Taxonomy,

    /// One assignment per input judgment, same order
    pub assignments: Vec<Assignment>,
}

impl Resolution {
    /// Folder assigned to a source path
    pub fn folder_for(&self, source_path: &Path) -> Option<&str> {
        self.assignments
            .iter()
            .find(|a| a.source_path == source_path)
            .map(|a| a.folder.as_str())
    }
}

/// Topics merged into one folder
#[derive(Debug, Default)]
struct Group {
    keys: Vec<String>,
    /// Trimmed raw topics with occurrence counts, first-seen order
    raw_topics: Vec<(String, usize)>,
}

impl Group {
    fn add(&mut self, key: &str, raw: &str) {
        if !self.keys.iter().any(|k| k == key) {
            self.keys.push(key.to_string());
        }
        match self.raw_topics.iter_mut().find(|(topic, _)| topic == raw) {
            Some((_, count)) => *count += 1,
            None => self.raw_topics.push((raw.to_string(), 1)),
        }
    }

    /// Most frequent raw topic; ties go to the first seen
    fn canonical(&self) -> &str {
        let mut best: Option<&(String, usize)> = None;
        for entry in &self.raw_topics {
            if best.map_or(true, |b| entry.1 > b.1) {
                best = Some(entry);
            }
        }
        best.map(|(topic, _)| topic.as_str()).unwrap_or_default()
    }
}

/// Where one judgment ends up
enum Route {
    Fallback,
    Group(usize),
}

/// Resolves judgments into a taxonomy and assignments
#[derive(Debug, Clone)]
pub struct TaxonomyResolver {
    policy: TaxonomyPolicy,
    reserved_keys: HashSet<String>,
}

impl TaxonomyResolver {
    /// Create a resolver
    ///
    /// # Errors
    ///
    /// Returns [`TaxonomyError::Config`] if the policy is invalid.
    pub fn new(policy: TaxonomyPolicy) -> Result<Self, TaxonomyError> {
        policy.validate().map_err(TaxonomyError::Config)?;

        let mut reserved_keys: HashSet<String> = policy
            .reserved_topics
            .iter()
            .map(|t| normalize_topic(t, policy.max_name_len))
            .collect();
        reserved_keys.insert(normalize_topic(&policy.fallback_folder, policy.max_name_len));

        Ok(Self {
            policy,
            reserved_keys,
        })
    }

    /// Active policy
    pub fn policy(&self) -> &TaxonomyPolicy {
        &self.policy
    }

    /// Resolve a whole batch of judgments
    ///
    /// Every judgment receives exactly one assignment. Folders appear in the
    /// taxonomy in first-seen order; the fallback folder only when used.
    pub fn resolve(&self, judgments: &[Judgment]) -> Result<Resolution, TaxonomyError> {
        let mut groups: Vec<Group> = Vec::new();
        let mut routes = Vec::with_capacity(judgments.len());

        for judgment in judgments {
            let route = match self.topic_key(judgment) {
                None => Route::Fallback,
                Some(key) => {
                    let raw = judgment.topic().trim();
                    let index = match groups.iter().position(|g| self.matches_group(g, &key)) {
                        Some(index) => index,
                        None => {
                            groups.push(Group::default());
                            groups.len() - 1
                        }
                    };
                    groups[index].add(&key, raw);
                    Route::Group(index)
                }
            };
            routes.push(route);
        }

        // Folder names, unique case-insensitively, fallback name reserved
        let fallback = self.policy.fallback_folder.clone();
        let mut used: HashSet<String> = HashSet::from([fallback.to_lowercase()]);
        let names: Vec<String> = groups
            .iter()
            .map(|group| {
                let base = sanitize_folder_name(group.canonical(), self.policy.max_name_len);
                let name = unique_name(&base, &used, self.policy.max_name_len);
                used.insert(name.to_lowercase());
                name
            })
            .collect();

        // Taxonomy in first-seen order
        let mut folders: Vec<TaxonomyFolder> = Vec::new();
        let mut emitted = vec![false; groups.len()];
        let mut fallback_index: Option<usize> = None;
        let mut assignments = Vec::with_capacity(judgments.len());

        for (judgment, route) in judgments.iter().zip(&routes) {
            let folder = match route {
                Route::Group(index) => {
                    if !emitted[*index] {
                        emitted[*index] = true;
                        folders.push(TaxonomyFolder {
                            name: names[*index].clone(),
                            raw_topics: groups[*index]
                                .raw_topics
                                .iter()
                                .map(|(topic, _)| topic.clone())
                                .collect(),
                        });
                    }
                    names[*index].clone()
                }
                Route::Fallback => {
                    let index = *fallback_index.get_or_insert_with(|| {
                        folders.push(TaxonomyFolder {
                            name: fallback.clone(),
                            raw_topics: Vec::new(),
                        });
                        folders.len() - 1
                    });
                    let raw = judgment.topic().trim();
                    let absorbed = &mut folders[index].raw_topics;
                    if !raw.is_empty() && !absorbed.iter().any(|t| t == raw) {
                        absorbed.push(raw.to_string());
                    }
                    fallback.clone()
                }
            };

            debug!("{:?} -> {}", judgment.source_path(), folder);
            assignments.push(Assignment {
                source_path: judgment.source_path().to_path_buf(),
                folder,
            });
        }

        let taxonomy = Taxonomy::from_folders(folders)?;
        info!(
            "Resolved {} documents into {} folders",
            assignments.len(),
            taxonomy.len()
        );

        Ok(Resolution {
            taxonomy,
            assignments,
        })
    }

    /// Comparison key, or `None` when the judgment belongs in the fallback folder
    fn topic_key(&self, judgment: &Judgment) -> Option<String> {
        if !judgment.is_success() {
            return None;
        }
        if judgment.confidence() < self.policy.min_confidence {
            debug!(
                "Low confidence {:.2} for {:?}",
                judgment.confidence(),
                judgment.source_path()
            );
            return None;
        }

        let key = normalize_topic(judgment.topic(), self.policy.max_name_len);
        if key.chars().count() < self.policy.min_topic_len || self.reserved_keys.contains(&key) {
            return None;
        }
        Some(key)
    }

    fn matches_group(&self, group: &Group, key: &str) -> bool {
        group.keys.iter().any(|existing| {
            existing == key
                || similarity(existing, key) >= self.policy.similarity_threshold
                || contains_with_ratio(existing, key, self.policy.containment_ratio)
        })
    }
}

/// `base`, or `base_2`, `base_3`, … when the name is already taken
fn unique_name(base: &str, used: &HashSet<String>, max_len: usize) -> String {
    if !used.contains(&base.to_lowercase()) {
        return base.to_string();
    }

    let mut n = 2usize;
    loop {
        let suffix = format!("_{}", n);
        let keep = max_len.saturating_sub(suffix.chars().count());
        let stem: String = base.chars().take(keep).collect();
        let candidate = format!("{}{}", stem.trim_end_matches('_'), suffix);
        if !used.contains(&candidate.to_lowercase()) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfsorter_domain::{FailureKind, ParseKind};
    use proptest::prelude::*;

    fn success(path: &str, topic: &str) -> Judgment {
        Judgment::success(path, topic, "", vec![], 0.9, ParseKind::Structured)
    }

    fn resolver() -> TaxonomyResolver {
        TaxonomyResolver::new(TaxonomyPolicy::default()).unwrap()
    }

    fn names(resolution: &Resolution) -> Vec<&str> {
        resolution.taxonomy.folder_names().collect()
    }

    fn folders(resolution: &Resolution) -> Vec<&str> {
        resolution
            .assignments
            .iter()
            .map(|a| a.folder.as_str())
            .collect()
    }

    #[test]
    fn test_spelling_variants_merge() {
        let judgments = vec![
            success("/in/a.pdf", "Machine Learning"),
            success("/in/b.pdf", "machine-learning"),
            success("/in/c.pdf", "Machine  Learning "),
        ];
        let resolution = resolver().resolve(&judgments).unwrap();

        assert_eq!(names(&resolution), vec!["Machine_Learning"]);
        assert_eq!(
            folders(&resolution),
            vec!["Machine_Learning", "Machine_Learning", "Machine_Learning"]
        );
        let folder = resolution.taxonomy.get("Machine_Learning").unwrap();
        assert_eq!(
            folder.raw_topics,
            vec!["Machine Learning", "machine-learning", "Machine  Learning"]
        );
    }

    #[test]
    fn test_distinct_topics_stay_apart() {
        let judgments = vec![
            success("/in/a.pdf", "Finance"),
            success("/in/b.pdf", "Healthcare"),
            success("/in/c.pdf", "Physics"),
            success("/in/d.pdf", "Astrophysics"),
        ];
        let resolution = resolver().resolve(&judgments).unwrap();
        assert_eq!(
            names(&resolution),
            vec!["Finance", "Healthcare", "Physics", "Astrophysics"]
        );
    }

    #[test]
    fn test_containment_merges() {
        let judgments = vec![success("/in/a.pdf", "Economics"), success("/in/b.pdf", "Economics UK")];
        let resolution = resolver().resolve(&judgments).unwrap();
        assert_eq!(names(&resolution), vec!["Economics"]);
    }

    #[test]
    fn test_canonical_name_is_most_frequent() {
        let judgments = vec![
            success("/in/a.pdf", "machine learning"),
            success("/in/b.pdf", "Machine Learning"),
            success("/in/c.pdf", "Machine Learning"),
        ];
        let resolution = resolver().resolve(&judgments).unwrap();
        assert_eq!(names(&resolution), vec!["Machine_Learning"]);
    }

    #[test]
    fn test_canonical_tie_goes_to_first_seen() {
        let judgments = vec![success("/in/a.pdf", "neural networks"), success("/in/b.pdf", "Neural Networks")];
        let resolution = resolver().resolve(&judgments).unwrap();
        assert_eq!(names(&resolution), vec!["neural_networks"]);
    }

    #[test]
    fn test_separators_are_sanitized() {
        let resolution = resolver().resolve(&[success("/in/a.pdf", "Tech/Science")]).unwrap();
        assert_eq!(names(&resolution), vec!["Tech_Science"]);
    }

    #[test]
    fn test_failed_and_skipped_go_to_fallback() {
        let judgments = vec![
            Judgment::extraction_failed("/in/a.pdf", "corrupted"),
            success("/in/b.pdf", "Healthcare"),
            Judgment::model_failed("/in/c.pdf", FailureKind::TimeoutError, "timed out"),
            Judgment::skipped("/in/d.pdf", "already indexed"),
        ];
        let resolution = resolver().resolve(&judgments).unwrap();

        assert_eq!(names(&resolution), vec!["Unsorted", "Healthcare"]);
        assert_eq!(
            folders(&resolution),
            vec!["Unsorted", "Healthcare", "Unsorted", "Unsorted"]
        );
    }

    #[test]
    fn test_low_confidence_short_and_reserved_topics_go_to_fallback() {
        let judgments = vec![
            Judgment::success("/in/a.pdf", "Finance", "", vec![], 0.1, ParseKind::Heuristic),
            success("/in/b.pdf", "X"),
            success("/in/c.pdf", ""),
            success("/in/d.pdf", "Uncategorized"),
            success("/in/e.pdf", "MISC"),
            success("/in/f.pdf", "unsorted"),
        ];
        let resolution = resolver().resolve(&judgments).unwrap();

        assert_eq!(names(&resolution), vec!["Unsorted"]);
        assert!(folders(&resolution).iter().all(|f| *f == "Unsorted"));
        let fallback = resolution.taxonomy.get("Unsorted").unwrap();
        assert!(fallback.raw_topics.contains(&"Finance".to_string()));
    }

    #[test]
    fn test_fallback_absent_when_unused() {
        let resolution = resolver().resolve(&[success("/in/a.pdf", "Law")]).unwrap();
        assert!(!resolution.taxonomy.contains("Unsorted"));
    }

    #[test]
    fn test_empty_batch() {
        let resolution = resolver().resolve(&[]).unwrap();
        assert!(resolution.taxonomy.is_empty());
        assert!(resolution.assignments.is_empty());
    }

    #[test]
    fn test_truncation_clash_gets_suffix() {
        let policy = TaxonomyPolicy {
            max_name_len: 8,
            similarity_threshold: 1.0,
            containment_ratio: 1.0,
            ..Default::default()
        };
        let resolver = TaxonomyResolver::new(policy).unwrap();
        let mut used = HashSet::new();
        used.insert("abcdefgh".to_string());
        assert_eq!(unique_name("ABCDEFGH", &used, 8), "ABCDEF_2");

        // Two topics that only differ after the cap collapse to one key
        let resolution = resolver
            .resolve(&[success("/in/a.pdf", "Statistics I"), success("/in/b.pdf", "Statistics II")])
            .unwrap();
        assert_eq!(names(&resolution), vec!["Statisti"]);
    }

    #[test]
    fn test_folder_for() {
        let resolution = resolver().resolve(&[success("/in/a.pdf", "Law")]).unwrap();
        assert_eq!(resolution.folder_for(Path::new("/in/a.pdf")), Some("Law"));
        assert_eq!(resolution.folder_for(Path::new("/in/zzz.pdf")), None);
    }

    #[test]
    fn test_invalid_policy_rejected() {
        let policy = TaxonomyPolicy {
            similarity_threshold: 2.0,
            ..Default::default()
        };
        assert!(matches!(
            TaxonomyResolver::new(policy),
            Err(TaxonomyError::Config(_))
        ));
    }

    fn judgment_strategy() -> impl Strategy<Value = Judgment> {
        let topics = prop::sample::select(vec![
            "Machine Learning",
            "machine-learning",
            "Healthcare",
            "Finance",
            "finance",
            "Tech/Science",
            "Unknown",
            "",
            "Économie",
        ]);
        (0usize..1000, topics, 0.0f64..=1.0, prop::bool::ANY).prop_map(
            |(id, topic, confidence, ok)| {
                let path = format!("/in/{}.pdf", id);
                if ok {
                    Judgment::success(path, topic, "", vec![], confidence, ParseKind::Structured)
                } else {
                    Judgment::extraction_failed(path, "broken")
                }
            },
        )
    }

    proptest! {
        #[test]
        fn prop_every_judgment_gets_one_known_folder(judgments in prop::collection::vec(judgment_strategy(), 0..30)) {
            let resolution = resolver().resolve(&judgments).unwrap();
            prop_assert_eq!(resolution.assignments.len(), judgments.len());
            for (assignment, judgment) in resolution.assignments.iter().zip(&judgments) {
                prop_assert_eq!(&assignment.source_path, &judgment.source_path().to_path_buf());
                prop_assert!(resolution.taxonomy.get(&assignment.folder).is_some());
            }
        }

        #[test]
        fn prop_resolution_is_deterministic(judgments in prop::collection::vec(judgment_strategy(), 0..30)) {
            let first = resolver().resolve(&judgments).unwrap();
            let second = resolver().resolve(&judgments).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
