//! The store engine: appending segments and resolving the merged view.

use std::collections::BTreeMap;

use ace_core::{parse_store, value, wrap, Entry, Identity, Recipient, Segment, SegmentKey, UnwrapError};
use tracing::{debug, info};

use crate::error::{Result, StoreError};
use crate::traits::SegmentLog;

/// Plaintext view of a store for one identity set.
pub type ResolvedEnv = BTreeMap<String, String>;

/// What an append wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentSummary {
    pub entries: usize,
    pub recipients: usize,
    pub bytes: usize,
}

/// Counters from one resolve pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveStats {
    pub segments: usize,
    pub opened: usize,
    pub skipped: usize,
}

/// Build a segment: fresh key, wrapped for `recipients`, values sealed.
pub fn seal_segment(recipients: &[Recipient], entries: &[(String, String)]) -> Result<Segment> {
    if recipients.is_empty() {
        return Err(StoreError::NoRecipients);
    }

    let key = SegmentKey::generate();
    let wrapped_key = wrap::wrap(recipients, &key)?.to_bytes()?;
    let entries = entries
        .iter()
        .map(|(name, plaintext)| -> Result<Entry> {
            Ok(Entry {
                name: name.clone(),
                ciphertext: value::encrypt(&key, plaintext)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Segment {
        wrapped_key,
        entries,
    })
}

/// Append one new segment to the end of the log.
///
/// Nothing is written unless the whole segment was built.
pub fn append_segment<L: SegmentLog + ?Sized>(
    log: &L,
    recipients: &[Recipient],
    entries: &[(String, String)],
) -> Result<SegmentSummary> {
    let segment = seal_segment(recipients, entries)?;
    let encoded = segment.encode();
    log.append(encoded.as_bytes())?;

    let summary = SegmentSummary {
        entries: segment.entries.len(),
        recipients: recipients.len(),
        bytes: encoded.len(),
    };
    info!(
        entries = summary.entries,
        recipients = summary.recipients,
        "appended segment"
    );
    Ok(summary)
}

/// Merge every segment the identities can open, in store order.
///
/// Later segments override earlier ones for the same name. Segments no
/// identity can open are skipped whole. Corruption anywhere in an opened
/// segment, or in any header, aborts the resolve.
pub fn resolve_text(text: &str, identities: &[Identity]) -> Result<(ResolvedEnv, ResolveStats)> {
    let segments = parse_store(text).map_err(|e| StoreError::Corrupt(e.to_string()))?;
    let mut env = ResolvedEnv::new();
    let mut stats = ResolveStats {
        segments: segments.len(),
        ..ResolveStats::default()
    };

    for (index, segment) in segments.iter().enumerate() {
        let key = match wrap::unwrap_bytes(identities, &segment.wrapped_key) {
            Ok(key) => key,
            Err(UnwrapError::NoMatch) => {
                debug!(segment = index, "segment not addressed to any identity, skipping");
                stats.skipped += 1;
                continue;
            }
            Err(UnwrapError::Corrupt(reason)) => {
                return Err(StoreError::Corrupt(format!("segment {index}: {reason}")));
            }
        };

        for entry in &segment.entries {
            let plaintext = value::decrypt(&key, &entry.ciphertext).map_err(|e| {
                StoreError::Corrupt(format!("segment {index}, entry {:?}: {e}", entry.name))
            })?;
            env.insert(entry.name.clone(), plaintext);
        }
        stats.opened += 1;
    }

    debug!(
        segments = stats.segments,
        opened = stats.opened,
        skipped = stats.skipped,
        "resolved store"
    );
    Ok((env, stats))
}

/// Read the log and resolve it, see [`resolve_text`].
pub fn resolve_with_stats<L: SegmentLog + ?Sized>(
    log: &L,
    identities: &[Identity],
) -> Result<(ResolvedEnv, ResolveStats)> {
    let bytes = log.read_all()?;
    let text = String::from_utf8(bytes)
        .map_err(|_| StoreError::Corrupt("store is not valid UTF-8".into()))?;
    resolve_text(&text, identities)
}

/// Read the log and resolve it for `identities`.
pub fn resolve<L: SegmentLog + ?Sized>(log: &L, identities: &[Identity]) -> Result<ResolvedEnv> {
    resolve_with_stats(log, identities).map(|(env, _)| env)
}
