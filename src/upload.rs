//! Upload command emission
//!
//! Uploads are never performed here. The generator only renders `aws s3 cp`
//! lines for an operator (or a later pipeline stage) to run.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::account::{AccountType, ArtifactPaths};
use crate::error::Result;

pub const DEFAULT_BUCKET: &str = "bantu-banco-da-nova-terra";

const SCRIPT_HEADER: &str = "#!/usr/bin/env bash\nset -euo pipefail\n\n";

/// Destination bucket for the emitted commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    pub bucket: String,
}

impl UploadTarget {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self { bucket: bucket.into() }
    }
}

impl Default for UploadTarget {
    fn default() -> Self {
        Self::new(DEFAULT_BUCKET)
    }
}

fn copy_command(target: &UploadTarget, account_type: AccountType, kind: &str, local: &Path) -> String {
    let file = local
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!(
        "aws s3 cp \"{}\" s3://{}/contas/{}/{}/{}",
        local.display(),
        target.bucket,
        account_type,
        kind,
        file
    )
}

/// One command per artifact, in json, pdf, qrcodes order.
pub fn upload_commands(target: &UploadTarget, account_type: AccountType, paths: &ArtifactPaths) -> Vec<String> {
    vec![
        copy_command(target, account_type, "json", &paths.json),
        copy_command(target, account_type, "pdf", &paths.pdf),
        copy_command(target, account_type, "qrcodes", &paths.qrcode),
    ]
}

/// Render the full script body, grouping entries by account type.
/// Within a group, entries keep the order they were given in.
pub fn render_upload_script<'a, I>(target: &UploadTarget, entries: I) -> String
where
    I: IntoIterator<Item = (AccountType, &'a ArtifactPaths)>,
{
    let mut groups: BTreeMap<AccountType, Vec<&ArtifactPaths>> = BTreeMap::new();
    for (account_type, paths) in entries {
        groups.entry(account_type).or_default().push(paths);
    }

    let mut script = String::from(SCRIPT_HEADER);
    for (account_type, group) in groups {
        script.push_str(&format!("# {account_type}\n"));
        for paths in group {
            for line in upload_commands(target, account_type, paths) {
                script.push_str(&line);
                script.push('\n');
            }
        }
    }
    script
}

/// Write the script to `path` and mark it executable.
pub fn write_upload_script(path: &Path, body: &str) -> Result<()> {
    fs::write(path, body)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    }

    Ok(())
}
