use crate::areas::refs::Head;
use crate::areas::repository::Repository;
use crate::artifacts::status::file_change::FileChangeType;
use crate::artifacts::status::status_info::StatusInfo;
use anyhow::Context;
use colored::Colorize;

#[derive(Debug, Clone, Default)]
pub struct StatusOptions {
    pub porcelain: bool,
}

impl Repository {
    pub fn show_status(&self, options: &StatusOptions) -> anyhow::Result<StatusInfo> {
        let status = self
            .status()
            .initialize()
            .context("Unable to compute repository status")?;

        if options.porcelain {
            self.print_porcelain_status(&status)?;
        } else {
            self.print_long_status(&status)?;
        }

        Ok(status)
    }

    fn print_porcelain_status(&self, status: &StatusInfo) -> anyhow::Result<()> {
        for (path, change) in &status.changes {
            writeln!(self.writer(), "{change} {path}")?;
        }

        for path in &status.untracked {
            writeln!(self.writer(), "?? {path}")?;
        }

        Ok(())
    }

    fn print_long_status(&self, status: &StatusInfo) -> anyhow::Result<()> {
        match self.refs().read_head_state()? {
            Head::Symbolic(branch) => writeln!(self.writer(), "On branch {branch}")?,
            Head::Detached(oid) => {
                writeln!(self.writer(), "HEAD detached at {}", oid.to_short_oid())?
            }
        }

        if status.is_clean() {
            writeln!(self.writer(), "nothing to commit, working tree clean")?;
            return Ok(());
        }

        let staged = status.index_changeset();
        if !staged.is_empty() {
            writeln!(self.writer(), "Changes to be committed:")?;
            self.print_changeset(staged.iter())?;
        }

        let unstaged = status.workspace_changeset();
        if !unstaged.is_empty() {
            writeln!(self.writer(), "Changes not staged for commit:")?;
            self.print_changeset(unstaged.iter())?;
        }

        let untracked = status.untracked_files();
        if !untracked.is_empty() {
            writeln!(self.writer(), "Untracked files:")?;
            for path in untracked {
                writeln!(self.writer(), "{:>8}{}", "", path.red())?;
            }
            writeln!(self.writer())?;
        }

        Ok(())
    }

    fn print_changeset<'c>(
        &self,
        changes: impl Iterator<Item = (&'c String, &'c FileChangeType)>,
    ) -> anyhow::Result<()> {
        for (path, change) in changes {
            let path = match change {
                FileChangeType::Index(_) => path.green(),
                FileChangeType::Workspace(_) => path.red(),
            };
            writeln!(self.writer(), "{change}{path}")?;
        }
        writeln!(self.writer())?;

        Ok(())
    }
}
