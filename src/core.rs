use std::fmt;

/// State of a pull request as far as cleanup is concerned
///
/// Merged pull requests count as closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullRequestState {
    Open,
    Closed,
}

/// Everything we know about a local branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub name: String,
    pub is_default: bool,
    pub is_pushed: bool,
    /// Only meaningful when the branch is pushed
    pub pull_requests: Vec<PullRequestState>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Default,
    Unpushed,
    PushedNoPr,
    PushedOpenPr,
    PushedAllClosed,
}

impl Classification {
    /// Stale branches are the only ones we ever delete
    pub fn is_stale(self) -> bool {
        self == Classification::PushedAllClosed
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Classification::Default => "default branch",
            Classification::Unpushed => "not pushed",
            Classification::PushedNoPr => "pushed, no pull request",
            Classification::PushedOpenPr => "pushed, open pull request",
            Classification::PushedAllClosed => "pushed, all pull requests closed",
        };
        f.write_str(label)
    }
}

/// Classify a branch
///
/// The checks are ordered, the first one that matches wins.
pub fn classify(branch: &Branch) -> Classification {
    if branch.is_default {
        return Classification::Default;
    }
    if !branch.is_pushed {
        return Classification::Unpushed;
    }
    if branch.pull_requests.is_empty() {
        return Classification::PushedNoPr;
    }
    if branch
        .pull_requests
        .iter()
        .any(|state| *state == PullRequestState::Open)
    {
        Classification::PushedOpenPr
    } else {
        Classification::PushedAllClosed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PullRequestState::{Closed, Open};

    fn branch(name: &str, is_default: bool, is_pushed: bool, prs: &[PullRequestState]) -> Branch {
        Branch {
            name: name.to_string(),
            is_default,
            is_pushed,
            pull_requests: prs.to_vec(),
        }
    }

    /// Every PR list shape worth checking against the precedence rules
    fn pr_lists() -> Vec<Vec<PullRequestState>> {
        vec![
            vec![],
            vec![Open],
            vec![Closed],
            vec![Closed, Closed],
            vec![Closed, Open],
            vec![Open, Open, Closed],
        ]
    }

    #[test]
    fn test_default_wins_over_everything() {
        for is_pushed in [true, false] {
            for prs in pr_lists() {
                let b = branch("main", true, is_pushed, &prs);
                assert_eq!(classify(&b), Classification::Default, "{:?}", b);
            }
        }
    }

    #[test]
    fn test_unpushed_ignores_pull_requests() {
        for prs in pr_lists() {
            let b = branch("feature/x", false, false, &prs);
            assert_eq!(classify(&b), Classification::Unpushed, "{:?}", b);
        }
    }

    #[test]
    fn test_pushed_without_pull_requests() {
        let b = branch("feature/y", false, true, &[]);
        assert_eq!(classify(&b), Classification::PushedNoPr);
    }

    #[test]
    fn test_any_open_pull_request_keeps_branch() {
        for prs in pr_lists().into_iter().filter(|prs| !prs.is_empty()) {
            let b = branch("feature/z", false, true, &prs);
            let expected = if prs.contains(&Open) {
                Classification::PushedOpenPr
            } else {
                Classification::PushedAllClosed
            };
            assert_eq!(classify(&b), expected, "{:?}", b);
        }
    }

    #[test]
    fn test_scenarios() {
        assert_eq!(classify(&branch("main", true, true, &[])), Classification::Default);
        assert_eq!(
            classify(&branch("feature/x", false, false, &[])),
            Classification::Unpushed
        );
        assert_eq!(
            classify(&branch("feature/y", false, true, &[])),
            Classification::PushedNoPr
        );
        assert_eq!(
            classify(&branch("feature/z", false, true, &[Open])),
            Classification::PushedOpenPr
        );
        assert_eq!(
            classify(&branch("feature/w", false, true, &[Closed, Closed])),
            Classification::PushedAllClosed
        );
    }

    #[test]
    fn test_only_all_closed_is_stale() {
        assert!(Classification::PushedAllClosed.is_stale());
        for c in [
            Classification::Default,
            Classification::Unpushed,
            Classification::PushedNoPr,
            Classification::PushedOpenPr,
        ] {
            assert!(!c.is_stale());
        }
    }
}
