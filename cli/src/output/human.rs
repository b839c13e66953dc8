//! Human-readable terminal renderer.

use std::path::Path;

use crate::domain::{DeployConfig, DeployPlan, PublishReport};
use crate::output::OutputContext;

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render a dry-run deploy plan.
    pub fn render_plan(&self, plan: &DeployPlan) {
        self.ctx.kv("Version:", plan.version.as_str());
        if let Some(host) = &plan.host {
            self.ctx.kv("Host:", host);
        }
        self.ctx.kv("Remote root:", &plan.remote_root);

        if !self.ctx.quiet {
            println!();
        }
        self.ctx.header("Directories:");
        for dir in &plan.directories {
            self.ctx.info(dir);
        }

        if !self.ctx.quiet {
            println!();
        }
        self.ctx
            .header(&format!("Artifacts ({}):", plan.artifacts.len()));
        for artifact in &plan.artifacts {
            self.ctx.info(&format!(
                "{} → {} + {}",
                artifact.local, artifact.current, artifact.versioned
            ));
        }
    }

    /// Render the summary after a successful publish.
    pub fn render_report(&self, report: &PublishReport) {
        self.ctx.success(&format!(
            "Published {} artifact(s), {} bytes, as version {}",
            report.artifacts.len(),
            report.total_bytes(),
            report.version
        ));
        self.ctx.success("Success");
    }

    /// Render the effective configuration.
    pub fn render_config(&self, config: &DeployConfig, path: &Path) {
        self.ctx.header("Configuration");
        self.ctx
            .kv("file (SITEPUB_CONFIG):", &path.display().to_string());
        if !self.ctx.quiet {
            println!();
        }
        for (key, value) in config.entries() {
            self.ctx.kv(&format!("{key}:"), &value);
        }
    }
}
