use crate::common::*;
use std::process::Command;

pub const DEFAULT_RUNTIME: &str = "docker";
pub const DEFAULT_IMAGE: &str = "cibersortx/fractions";
const CONTAINER_NAME: &str = "cibersortx-fractions";

/// One `CIBERSORTx fractions` container run. The input and output
/// directories are bind-mounted to `/src/data` and `/src/outdir`.
#[derive(Debug, Clone)]
pub struct FractionsJob {
    pub runtime: Box<str>,
    pub image: Box<str>,
    pub input_dir: Box<str>,
    pub output_dir: Box<str>,
    pub username: Box<str>,
    pub token: Box<str>,
    pub refsample: Box<str>,
    pub mixture: Box<str>,
}

impl FractionsJob {
    /// Arguments passed to the container runtime
    pub fn args(&self) -> Vec<String> {
        let mut args: Vec<String> = vec![
            "run".into(),
            "--rm".into(),
            "--name".into(),
            CONTAINER_NAME.into(),
            "-v".into(),
            format!("{}:/src/data", self.input_dir),
            "-v".into(),
            format!("{}:/src/outdir", self.output_dir),
            self.image.to_string(),
        ];

        let tool_args: [(&str, &str); 7] = [
            ("--username", self.username.as_ref()),
            ("--token", self.token.as_ref()),
            ("--single_cell", "TRUE"),
            ("--fraction", "0"),
            ("--rmbatchSmode", "TRUE"),
            ("--refsample", self.refsample.as_ref()),
            ("--mixture", self.mixture.as_ref()),
        ];

        for (k, v) in tool_args {
            args.push(k.to_string());
            args.push(v.to_string());
        }
        args
    }

    /// The full command line with the token masked, for logging
    pub fn masked_command_line(&self) -> String {
        let mut words = vec![self.runtime.to_string()];
        let mut mask_next = false;
        for a in self.args() {
            if mask_next {
                words.push("****".into());
                mask_next = false;
            } else {
                mask_next = a == "--token";
                words.push(a);
            }
        }
        words.join(" ")
    }

    /// Run the container and wait for it. A non-zero exit status is
    /// an error.
    pub fn run(&self) -> anyhow::Result<()> {
        info!("{}", self.masked_command_line());

        let status = Command::new(self.runtime.as_ref())
            .args(self.args())
            .status()
            .map_err(|e| anyhow::anyhow!("failed to launch `{}`: {}", self.runtime, e))?;

        if !status.success() {
            warn!("CIBERSORTx fractions exited with {}", status);
            return Err(anyhow::anyhow!("CIBERSORTx fractions failed ({})", status));
        }

        info!("CIBERSORTx fractions finished: {}", self.output_dir);
        Ok(())
    }
}
