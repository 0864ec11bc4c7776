//! Alt account correlation.
//!
//! The subject is resolved once, the correlation provider is asked for
//! linked names, and every linked name is enriched concurrently. A failing
//! provider only ever affects the candidate it was queried for; its failure
//! is recorded in that candidate's [`Outcome`].

use crate::{
    api::{Account, ApiError, Upstream},
    state::RenderStyles,
    stats::{self, Ratio},
};
use futures::future::join_all;
use linked_hash_set::LinkedHashSet;
use std::fmt::{self, Display};

/// Name shown for linkage entries the provider returned without a username.
pub const UNKNOWN_CANDIDATE: &str = "Unknown";

pub fn namemc_url(id: &str) -> String {
    format!("https://namemc.com/profile/{}", id)
}

/// A name linked to the subject, verified against the identity provider if possible.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    pub raw_name: String,
    pub account: Option<Account>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Reputation {
    /// Title-cased tag names in the order the provider listed them.
    Tags(LinkedHashSet<String>),
    /// The provider rejected our api key.
    ProviderDegraded,
    ProviderError,
}

impl Reputation {
    pub fn from_lookup(lookup: Result<Vec<String>, ApiError>) -> Self {
        match lookup {
            Ok(types) => {
                // `insert` would move a repeated tag to the back.
                let mut tags = LinkedHashSet::new();
                for tag in &types {
                    tags.insert_if_absent(title_case(tag));
                }
                Reputation::Tags(tags)
            }
            Err(ApiError::ProviderDegraded) => Reputation::ProviderDegraded,
            Err(_) => Reputation::ProviderError,
        }
    }
}

impl Display for Reputation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reputation::Tags(tags) if tags.is_empty() => write!(f, "None"),
            Reputation::Tags(tags) => {
                let tags: Vec<&str> = tags.iter().map(String::as_str).collect();
                write!(f, "{}", tags.join(", "))
            }
            Reputation::ProviderDegraded => write!(f, "Urchin API is currently down"),
            Reputation::ProviderError => write!(f, "Error fetching Urchin data"),
        }
    }
}

/// Upper-cases the first letter of every alphabetic run and lower-cases the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// Everything learned about one candidate.
#[derive(Clone, Debug, PartialEq)]
pub struct Outcome {
    pub candidate: Candidate,
    pub ratio: Ratio,
    /// `None` when there was no name to look up.
    pub reputation: Option<Reputation>,
    pub render_style: String,
}

impl Outcome {
    /// The line shown for this candidate. Reports are ordered by it.
    pub fn label(&self) -> String {
        let name = match &self.candidate.account {
            Some(account) => format!("[{}]({})", self.candidate.raw_name, namemc_url(&account.id)),
            None => self.candidate.raw_name.clone(),
        };

        match &self.reputation {
            Some(reputation) => format!("{} | {} FKDR | {}", name, self.ratio, reputation),
            None => format!("{} | {} FKDR", name, self.ratio),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    pub subject: Account,
    pub subject_ratio: Ratio,
    pub subject_reputation: Reputation,
    /// Render style for the subject's skin thumbnail.
    pub render_style: String,
    /// Sorted by [`Outcome::label`].
    pub outcomes: Vec<Outcome>,
}

async fn final_kill_ratio(upstream: &dyn Upstream, id: &str) -> Ratio {
    match upstream.raw_stats(id).await {
        Ok(html) => {
            let (final_kills, final_deaths) = stats::final_kill_pair(&html);
            Ratio::from_finals(final_kills, final_deaths)
        }
        Err(e) => {
            log::warn!("Stats lookup for {} failed: {}", id, e);
            Ratio::Unavailable
        }
    }
}

async fn reputation(upstream: &dyn Upstream, username: &str) -> Reputation {
    let lookup = upstream.tags(username).await;
    if let Err(e) = &lookup {
        log::warn!("Reputation lookup for '{}' failed: {}", username, e);
    }
    Reputation::from_lookup(lookup)
}

/// Linked names for an account. Provider failures read as "no alts".
pub async fn enumerate(upstream: &dyn Upstream, id: &str) -> Vec<Option<String>> {
    match upstream.linked_names(id).await {
        Ok(names) => names,
        Err(e) => {
            log::warn!("Alt lookup for {} failed, reporting none: {}", id, e);
            Vec::new()
        }
    }
}

/// Enriches a single candidate. Never fails; failures are part of the outcome.
pub async fn enrich<S>(upstream: &dyn Upstream, styles: &S, raw_name: Option<String>) -> Outcome
where
    S: RenderStyles + ?Sized,
{
    let name = match raw_name {
        Some(name) => name,
        None => {
            return Outcome {
                candidate: Candidate {
                    raw_name: UNKNOWN_CANDIDATE.to_string(),
                    account: None,
                },
                ratio: Ratio::Unavailable,
                reputation: None,
                render_style: styles.render_style(UNKNOWN_CANDIDATE),
            }
        }
    };

    let verified = async {
        match upstream.resolve(&name).await {
            Ok(account) => {
                let ratio = final_kill_ratio(upstream, &account.id).await;
                (Some(account), ratio)
            }
            Err(e) => {
                log::warn!("Could not verify candidate '{}': {}", name, e);
                (None, Ratio::Unavailable)
            }
        }
    };
    let ((account, ratio), reputation) = futures::join!(verified, reputation(upstream, &name));

    Outcome {
        render_style: styles.render_style(&name),
        candidate: Candidate {
            raw_name: name,
            account,
        },
        ratio,
        reputation: Some(reputation),
    }
}

/// Orders outcomes by label and attaches them to the subject's data.
///
/// Duplicate accounts are kept.
pub fn aggregate(
    subject: Account,
    subject_ratio: Ratio,
    subject_reputation: Reputation,
    render_style: String,
    mut outcomes: Vec<Outcome>,
) -> Report {
    outcomes.sort_by_cached_key(Outcome::label);

    Report {
        subject,
        subject_ratio,
        subject_reputation,
        render_style,
        outcomes,
    }
}

/// Full alt check for a username.
///
/// Only an unresolvable subject is an error.
pub async fn check<S>(upstream: &dyn Upstream, styles: &S, username: &str) -> Result<Report, ApiError>
where
    S: RenderStyles + Sync + ?Sized,
{
    let subject = upstream.resolve(username).await?;
    log::info!("Resolved '{}' to {} ({})", username, subject.name, subject.id);

    let (subject_ratio, subject_reputation, linked) = futures::join!(
        final_kill_ratio(upstream, &subject.id),
        reputation(upstream, &subject.name),
        enumerate(upstream, &subject.id),
    );
    log::info!("Found {} linked names for {}", linked.len(), subject.name);

    let outcomes = join_all(
        linked
            .into_iter()
            .map(|raw_name| enrich(upstream, styles, raw_name)),
    )
    .await;

    // Overrides are keyed by what admins typed, which may differ from the canonical name.
    let render_style = match styles.get(username) {
        Some(style) => style.to_string(),
        None => styles.render_style(&subject.name),
    };

    Ok(aggregate(
        subject,
        subject_ratio,
        subject_reputation,
        render_style,
        outcomes,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeUpstream;
    use std::collections::HashMap;

    const I4W: &str = "4b3f3c5d2a7e4f0f9a6c1e2d3b4a5c6d";

    fn outcome(name: &str, id: Option<&str>, ratio: Ratio) -> Outcome {
        Outcome {
            candidate: Candidate {
                raw_name: name.to_string(),
                account: id.map(|id| Account {
                    id: id.to_string(),
                    name: name.to_string(),
                }),
            },
            ratio,
            reputation: Some(Reputation::Tags(LinkedHashSet::new())),
            render_style: "default".to_string(),
        }
    }

    fn subject() -> Account {
        Account {
            id: I4W.to_string(),
            name: "i4w".to_string(),
        }
    }

    #[test]
    fn tags_are_title_cased_and_deduplicated() {
        let reputation = Reputation::from_lookup(Ok(vec![
            "sniper".to_string(),
            "closet_cheater".to_string(),
            "SNIPER".to_string(),
            "blatant cheater".to_string(),
        ]));

        assert_eq!(
            reputation.to_string(),
            "Sniper, Closet_Cheater, Blatant Cheater"
        );
    }

    #[test]
    fn repeated_tag_keeps_first_position() {
        let reputation = Reputation::from_lookup(Ok(vec![
            "legit".to_string(),
            "sniper".to_string(),
            "LEGIT".to_string(),
        ]));

        match reputation {
            Reputation::Tags(tags) => {
                let tags: Vec<&str> = tags.iter().map(String::as_str).collect();
                assert_eq!(tags, vec!["Legit", "Sniper"]);
            }
            other => panic!("expected tags, got {:?}", other),
        }
    }

    #[test]
    fn reputation_sentinels() {
        assert_eq!(Reputation::from_lookup(Ok(vec![])).to_string(), "None");
        assert_eq!(
            Reputation::from_lookup(Err(ApiError::ProviderDegraded)).to_string(),
            "Urchin API is currently down"
        );
        assert_eq!(
            Reputation::from_lookup(Err(ApiError::ProviderError("503".into()))).to_string(),
            "Error fetching Urchin data"
        );
    }

    #[test]
    fn title_case_words() {
        assert_eq!(title_case("legit sniper"), "Legit Sniper");
        assert_eq!(title_case("cAT"), "Cat");
        assert_eq!(title_case("1st_place"), "1St_Place");
    }

    #[test]
    fn labels() {
        assert_eq!(
            outcome("Steve", Some("abc"), Ratio::Fraction(2.5)).label(),
            "[Steve](https://namemc.com/profile/abc) | 2.50 FKDR | None"
        );
        assert_eq!(
            outcome("Ghost", None, Ratio::Unavailable).label(),
            "Ghost | N/A FKDR | None"
        );

        let mut unknown = outcome(UNKNOWN_CANDIDATE, None, Ratio::Unavailable);
        unknown.reputation = None;
        assert_eq!(unknown.label(), "Unknown | N/A FKDR");
    }

    #[test]
    fn aggregate_order_ignores_arrival_order() {
        let outcomes = vec![
            outcome("zed", Some("1"), Ratio::Whole(3)),
            outcome("Alpha", Some("2"), Ratio::Fraction(1.0)),
            outcome("beta", None, Ratio::Unavailable),
            outcome("Alpha", Some("2"), Ratio::Fraction(1.0)),
            outcome("Zulu", Some("3"), Ratio::Unavailable),
        ];

        let expected: Vec<String> =
            aggregate(subject(), Ratio::Unavailable, Reputation::ProviderError, "default".into(), outcomes.clone())
                .outcomes
                .iter()
                .map(Outcome::label)
                .collect();

        for rotation in 1..outcomes.len() {
            let mut permuted = outcomes.clone();
            permuted.rotate_left(rotation);
            let len = permuted.len();
            permuted.swap(0, rotation % len);

            let labels: Vec<String> =
                aggregate(subject(), Ratio::Unavailable, Reputation::ProviderError, "default".into(), permuted)
                    .outcomes
                    .iter()
                    .map(Outcome::label)
                    .collect();
            assert_eq!(labels, expected);
        }

        // Case-sensitive: resolved labels start with '[' which sorts after upper-case.
        assert!(expected[0].starts_with("[Alpha]"));
        assert_eq!(expected.len(), 5);
        assert!(expected.last().unwrap().starts_with("beta"));
    }

    #[tokio::test]
    async fn no_candidates() {
        let upstream = FakeUpstream::default().player("i4w", I4W, 10, 4);
        let styles: HashMap<String, String> = HashMap::new();

        let report = check(&upstream, &styles, "i4w").await.unwrap();

        assert_eq!(report.subject, subject());
        assert!(report.outcomes.is_empty());
        assert_eq!(report.subject_ratio, Ratio::Fraction(2.5));
        assert_eq!(report.render_style, "default");
    }

    #[tokio::test]
    async fn unknown_subject_is_not_found() {
        let upstream = FakeUpstream::default();
        let styles: HashMap<String, String> = HashMap::new();

        assert_eq!(
            check(&upstream, &styles, "nobody").await.unwrap_err(),
            ApiError::NotFound
        );
    }

    #[tokio::test]
    async fn one_failing_candidate_does_not_affect_others() {
        let upstream = FakeUpstream::default()
            .player("i4w", I4W, 5, 0)
            .player("alpha", "a1", 10, 4)
            .player("bravo", "b2", 3, 3)
            .player("charlie", "c3", 0, 0)
            .tagged("i4w", Ok(vec!["sniper"]))
            .tagged("alpha", Ok(vec!["legit"]))
            .tagged("charlie", Err(ApiError::ProviderError("502".into())))
            .linked(I4W, vec![Some("charlie"), Some("alpha"), Some("bravo")]);
        let styles: HashMap<String, String> = HashMap::new();

        let report = check(&upstream, &styles, "i4w").await.unwrap();

        assert_eq!(report.subject_ratio, Ratio::Whole(5));
        assert_eq!(report.subject_reputation.to_string(), "Sniper");
        assert_eq!(report.outcomes.len(), 3);

        let populated = report
            .outcomes
            .iter()
            .filter(|o| {
                o.candidate.account.is_some()
                    && o.ratio != Ratio::Unavailable
                    && matches!(o.reputation, Some(Reputation::Tags(_)))
            })
            .count();
        assert_eq!(populated, 2);

        let charlie = &report.outcomes[2];
        assert_eq!(charlie.candidate.raw_name, "charlie");
        assert_eq!(charlie.reputation, Some(Reputation::ProviderError));
        assert_eq!(charlie.ratio, Ratio::Unavailable);

        assert_eq!(
            report.outcomes[0].label(),
            "[alpha](https://namemc.com/profile/a1) | 2.50 FKDR | Legit"
        );
    }

    #[tokio::test]
    async fn unresolvable_and_unnamed_candidates_are_reported() {
        let upstream = FakeUpstream::default()
            .player("i4w", I4W, 1, 1)
            .tagged("ghost", Err(ApiError::ProviderDegraded))
            .linked(I4W, vec![Some("ghost"), None]);
        let styles: HashMap<String, String> = HashMap::new();

        let report = check(&upstream, &styles, "i4w").await.unwrap();
        let labels: Vec<String> = report.outcomes.iter().map(Outcome::label).collect();

        assert_eq!(
            labels,
            vec![
                "Unknown | N/A FKDR".to_string(),
                "ghost | N/A FKDR | Urchin API is currently down".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn duplicate_candidates_are_kept() {
        let upstream = FakeUpstream::default()
            .player("i4w", I4W, 1, 1)
            .player("alpha", "a1", 1, 1)
            .linked(I4W, vec![Some("alpha"), Some("alpha")]);
        let styles: HashMap<String, String> = HashMap::new();

        let report = check(&upstream, &styles, "i4w").await.unwrap();

        assert_eq!(report.outcomes.len(), 2);
        assert_eq!(report.outcomes[0], report.outcomes[1]);
    }

    #[tokio::test]
    async fn enumerator_failure_reads_as_no_alts() {
        let mut upstream = FakeUpstream::default().player("i4w", I4W, 1, 1);
        upstream
            .linked
            .insert(I4W.to_string(), Err(ApiError::ProviderDegraded));

        assert!(enumerate(&upstream, I4W).await.is_empty());
    }

    #[tokio::test]
    async fn render_styles_follow_overrides() {
        let upstream = FakeUpstream::default()
            .player("I4W", I4W, 1, 1)
            .player("alpha", "a1", 1, 1)
            .linked(I4W, vec![Some("alpha")]);
        let mut styles = HashMap::new();
        styles.insert("I4W".to_string(), "walking".to_string());
        styles.insert("alpha".to_string(), "clown".to_string());

        let report = check(&upstream, &styles, "I4W").await.unwrap();

        assert_eq!(report.render_style, "walking");
        assert_eq!(report.outcomes[0].render_style, "clown");
    }
}
