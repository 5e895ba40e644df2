use crate::comment::COMMENT_MARKER;
use crate::config::RepoId;
use anyhow::{Context, Result};
use octocrab::Octocrab;

/// Posts the analysis comment on a pull request.
pub struct GitHubClient {
    octocrab: Octocrab,
}

impl GitHubClient {
    pub fn new(token: String) -> Result<Self> {
        Ok(Self {
            octocrab: Octocrab::builder().personal_token(token).build()?,
        })
    }

    /// Updates the pull request's marked comment, or creates it if there is none.
    pub async fn create_or_update_comment(
        &self,
        repo_id: &RepoId,
        pr_number: u64,
        body: &str,
    ) -> Result<()> {
        let issues = self.octocrab.issues(&repo_id.owner, &repo_id.repo);

        let first_page = issues
            .list_comments(pr_number)
            .per_page(100)
            .send()
            .await
            .with_context(|| format!("Failed to list comments on {repo_id}#{pr_number}"))?;
        let comments = self.octocrab.all_pages(first_page).await?;

        match comments
            .iter()
            .find(|comment| is_action_comment(comment.body.as_deref()))
        {
            Some(existing) => {
                issues.update_comment(existing.id, body).await?;
                tracing::info!(repo_id = %repo_id, pr_number, "Updated analysis comment");
            }
            None => {
                issues.create_comment(pr_number, body).await?;
                tracing::info!(repo_id = %repo_id, pr_number, "Created analysis comment");
            }
        }

        Ok(())
    }
}

pub fn is_action_comment(body: Option<&str>) -> bool {
    body.is_some_and(|body| body.contains(COMMENT_MARKER))
}
