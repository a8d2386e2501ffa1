use regex::Regex;

/// Link templates derived from a GitHub remote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteLinks {
    compare: String,
    pull_request: String,
    commit: String,
}

impl RemoteLinks {
    /// Recognize a GitHub remote (HTTPS, `git@github.com:` or `ssh://`) and
    /// derive compare, pull request and commit link templates from it.
    ///
    /// Returns `None` for any other host.
    pub fn from_remote_url(url: &str) -> Option<Self> {
        let github = Regex::new(
            r"^(?:https?://(?:[^@/]+@)?github\.com/|git@github\.com:|ssh://git@github\.com(?::\d+)?/)(?P<owner>[^/]+)/(?P<repo>[^/]+?)(?:\.git)?/?$",
        )
        .ok()?;

        let captures = github.captures(url.trim())?;
        let base = format!("https://github.com/{}/{}", &captures["owner"], &captures["repo"]);

        Some(RemoteLinks {
            compare: format!("{}/compare/{{from}}...{{to}}", base),
            pull_request: format!("{}/pull/{{number}}", base),
            commit: format!("{}/commit/{{hash}}", base),
        })
    }

    pub fn compare_url(&self, from: &str, to: &str) -> String {
        self.compare.replace("{from}", from).replace("{to}", to)
    }

    pub fn pull_request_url(&self, number: &str) -> String {
        self.pull_request.replace("{number}", number)
    }

    pub fn commit_url(&self, hash: &str) -> String {
        self.commit.replace("{hash}", hash)
    }
}
