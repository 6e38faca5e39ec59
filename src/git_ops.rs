use anyhow::{Context, Result};
use git2::{Repository, Signature, Time};
use std::path::Path;
use std::sync::Mutex;

/// Git journal for the data file
///
/// When the data file lives inside a git work tree every save is committed,
/// giving the task list a browsable history. Outside a work tree the journal
/// is simply not created.
pub struct GitJournal {
    repo: Mutex<Repository>,
}

impl GitJournal {
    /// Discover the repository containing `file_path`, if any
    pub fn discover(file_path: &Path) -> Option<Self> {
        let dir = match file_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        Repository::discover(dir).ok().map(|repo| Self {
            repo: Mutex::new(repo),
        })
    }

    /// Stage `file_path` and commit it on top of HEAD
    pub fn commit(&self, file_path: &Path, message: &str) -> Result<()> {
        let repo = self
            .repo
            .lock()
            .map_err(|_| anyhow::anyhow!("git journal lock poisoned"))?;

        let workdir = repo
            .workdir()
            .context("Repository has no working directory")?
            .canonicalize()
            .context("Failed to resolve repository working directory")?;
        let absolute = file_path
            .canonicalize()
            .context("Failed to resolve data file path")?;
        let relative = absolute
            .strip_prefix(&workdir)
            .context("Data file is not inside the repository")?;

        let mut index = repo.index()?;
        index.add_path(relative)?;
        index.write()?;

        let tree_id = index.write_tree()?;
        let tree = repo.find_tree(tree_id)?;

        let parent = match repo.head() {
            Ok(head) => {
                let oid = head.target().context("HEAD has no target")?;
                Some(repo.find_commit(oid)?)
            }
            Err(_) => None,
        };

        // Nothing staged relative to HEAD
        if let Some(ref parent) = parent
            && parent.tree_id() == tree_id
        {
            return Ok(());
        }

        let signature = Self::signature(&repo)?;
        let parents: Vec<_> = parent.iter().collect();
        repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )?;

        tracing::debug!(message, "committed data file to git journal");
        Ok(())
    }

    fn signature(repo: &Repository) -> Result<Signature<'static>> {
        let config = repo.config()?;
        let name = config
            .get_string("user.name")
            .unwrap_or_else(|_| "Anjez".to_string());
        let email = config
            .get_string("user.email")
            .unwrap_or_else(|_| "anjez@localhost".to_string());

        match Signature::now(&name, &email) {
            Ok(sig) => Ok(sig),
            Err(_) => {
                let time = Time::new(1_700_000_000, 0);
                Signature::new(&name, &email, &time)
                    .context("Failed to create signature with fixed time")
            }
        }
    }
}
