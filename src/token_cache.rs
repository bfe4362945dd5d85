//! Persisted cache of previously issued session tokens.
//!
//! Grounded on the pre-tokio ancestor's `Discord::new_cache` (a tab-separated,
//! one-line-per-identity file, rewritten whole on every `store`). The
//! ancestor keys solely by email; we additionally store a digest of the
//! secret so that a changed password/token invalidates the cached value
//! without ever writing the secret itself to disk.

use std::collections::HashMap;
use std::fs::File;
use std::hash::{Hash, Hasher};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

fn digest(secret: &str) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    secret.hash(&mut hasher);
    hasher.finish()
}

/// A single cached entry: the digest of the secret the token was issued for,
/// and the token itself.
struct Entry {
    secret_digest: u64,
    token: String,
}

/// Maps `(identity, secret)` to a previously issued token, persisted on disk
/// so that repeated runs of the same process identity skip the REST login
/// call entirely.
///
/// Never returns a token for a mismatched secret: a cache hit requires the
/// stored secret digest to match the digest of the secret passed to
/// `lookup`.
pub struct TokenCache {
    path: PathBuf,
    entries: HashMap<String, Entry>,
}

impl TokenCache {
    /// Load the cache from `path`, if it exists. A missing or unreadable
    /// file is treated as an empty cache, not an error.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let mut entries = HashMap::new();

        if let Ok(file) = File::open(&path) {
            for line in BufReader::new(file).lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(err) => {
                        warn!(error = ?err, "failed to read a line of the token cache");
                        continue;
                    }
                };
                let mut parts = line.splitn(3, '\t');
                let (identity, digest_str, token) =
                    match (parts.next(), parts.next(), parts.next()) {
                        (Some(i), Some(d), Some(t)) => (i, d, t),
                        _ => continue,
                    };
                let Ok(secret_digest) = digest_str.parse::<u64>() else {
                    continue;
                };
                entries.insert(
                    identity.to_string(),
                    Entry {
                        secret_digest,
                        token: token.to_string(),
                    },
                );
            }
        }

        TokenCache { path, entries }
    }

    /// Look up a token previously stored for `(identity, secret)`. Returns
    /// `None` if the identity is unknown or the secret has changed since the
    /// token was cached.
    pub fn lookup(&self, identity: &str, secret: &str) -> Option<String> {
        let entry = self.entries.get(identity)?;
        if entry.secret_digest == digest(secret) {
            Some(entry.token.clone())
        } else {
            None
        }
    }

    /// Record `token` as the token currently valid for `(identity, secret)`,
    /// persisting it to disk. A write failure is logged but not fatal: the
    /// token is still usable for the rest of this process's lifetime.
    pub fn store(&mut self, identity: &str, secret: &str, token: &str) {
        self.entries.insert(
            identity.to_string(),
            Entry {
                secret_digest: digest(secret),
                token: token.to_string(),
            },
        );
        if let Err(err) = self.flush() {
            warn!(error = ?err, path = %self.path.display(), "failed to persist token cache");
        }
    }

    fn flush(&self) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let tmp_path = self.path.with_extension("tmp");
        let mut file = File::create(&tmp_path)?;
        for (identity, entry) in &self.entries {
            writeln!(file, "{}\t{}\t{}", identity, entry.secret_digest, entry.token)?;
        }
        file.flush()?;
        std::fs::rename(&tmp_path, &self.path)?;
        debug!(path = %self.path.display(), count = self.entries.len(), "wrote token cache");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_misses_on_changed_secret() {
        let dir = std::env::temp_dir().join(format!(
            "discord-gateway-token-cache-test-{}",
            digest(&format!("{:p}", &dir_marker as *const _))
        ));
        fn dir_marker() {}
        let path = dir.join("tokens.tsv");

        let mut cache = TokenCache::load(&path);
        cache.store("alice@example.com", "hunter2", "ABC");
        assert_eq!(
            cache.lookup("alice@example.com", "hunter2"),
            Some("ABC".to_string())
        );
        assert_eq!(cache.lookup("alice@example.com", "wrong"), None);

        let reloaded = TokenCache::load(&path);
        assert_eq!(
            reloaded.lookup("alice@example.com", "hunter2"),
            Some("ABC".to_string())
        );

        let _ = std::fs::remove_dir_all(&dir);
    }
}
