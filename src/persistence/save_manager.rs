use super::save_data::{SaveData, REQUIRED_ROOT_FIELDS};
use super::store::SaveStore;
use super::SaveError;
use crate::core::constants::{BACKUP_SAVE_KEY, PRIMARY_SAVE_KEY, SAVE_VERSION, SAVE_VERSION_MAGIC};
use sha2::{Digest, Sha256};
use tracing::{error, info, warn};

const MAGIC_LEN: usize = 8;
const LENGTH_LEN: usize = 4;
const CHECKSUM_LEN: usize = 32;
const HEADER_LEN: usize = MAGIC_LEN + LENGTH_LEN;

fn checksum(magic: &[u8], length: &[u8], payload: &[u8]) -> [u8; CHECKSUM_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(magic);
    hasher.update(length);
    hasher.update(payload);
    hasher.finalize().into()
}

/// Wraps a save in the on-disk envelope.
///
/// Layout:
/// - Version magic (8 bytes, LE)
/// - Payload length (4 bytes, LE)
/// - JSON payload (variable length)
/// - SHA-256 over the three fields above (32 bytes)
pub fn encode(data: &SaveData) -> Result<Vec<u8>, SaveError> {
    let payload = serde_json::to_vec(data)?;
    let magic = SAVE_VERSION_MAGIC.to_le_bytes();
    let length = (payload.len() as u32).to_le_bytes();
    let digest = checksum(&magic, &length, &payload);

    let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len() + CHECKSUM_LEN);
    bytes.extend_from_slice(&magic);
    bytes.extend_from_slice(&length);
    bytes.extend_from_slice(&payload);
    bytes.extend_from_slice(&digest);
    Ok(bytes)
}

/// Verifies and unwraps an envelope written by [`encode`].
pub fn decode(bytes: &[u8]) -> Result<SaveData, SaveError> {
    if bytes.len() < HEADER_LEN {
        return Err(SaveError::Truncated {
            needed: HEADER_LEN,
            available: bytes.len(),
        });
    }
    let (magic_bytes, rest) = bytes.split_at(MAGIC_LEN);
    let (length_bytes, rest) = rest.split_at(LENGTH_LEN);

    let mut magic = [0u8; MAGIC_LEN];
    magic.copy_from_slice(magic_bytes);
    let found = u64::from_le_bytes(magic);
    if found != SAVE_VERSION_MAGIC {
        return Err(SaveError::BadMagic {
            expected: SAVE_VERSION_MAGIC,
            found,
        });
    }

    let mut length = [0u8; LENGTH_LEN];
    length.copy_from_slice(length_bytes);
    let payload_len = u32::from_le_bytes(length) as usize;
    let needed = payload_len + CHECKSUM_LEN;
    if rest.len() < needed {
        return Err(SaveError::Truncated {
            needed: HEADER_LEN + needed,
            available: bytes.len(),
        });
    }
    let (payload, rest) = rest.split_at(payload_len);
    let stored = &rest[..CHECKSUM_LEN];

    if checksum(magic_bytes, length_bytes, payload) != stored {
        return Err(SaveError::Checksum);
    }

    let value: serde_json::Value = serde_json::from_slice(payload)?;
    for field in REQUIRED_ROOT_FIELDS {
        if value.get(field).map_or(true, |v| v.is_null()) {
            return Err(SaveError::MissingRoot(field));
        }
    }
    let mut data: SaveData = serde_json::from_value(value)?;
    if data.version > SAVE_VERSION {
        warn!(version = data.version, supported = SAVE_VERSION, "save written by a newer version");
    }
    data.player.normalize();
    Ok(data)
}

/// Which slot a load was served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Primary,
    Backup,
    /// Neither slot was usable; a default save was created.
    Fresh,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
    pub data: SaveData,
    pub source: LoadSource,
}

/// Primary/backup slot management over a [`SaveStore`].
#[derive(Debug)]
pub struct SaveManager<S: SaveStore> {
    store: S,
}

impl<S: SaveStore> SaveManager<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn has_save(&self) -> bool {
        matches!(self.store.contains(PRIMARY_SAVE_KEY), Ok(true))
    }

    /// Writes `data` to the primary slot.
    ///
    /// The current primary is copied to the backup slot first, but only if it
    /// still verifies; a corrupt primary never overwrites a good backup. On
    /// error the previous backup is untouched.
    pub fn save(&mut self, data: &SaveData) -> Result<(), SaveError> {
        let bytes = encode(data)?;

        if let Some(current) = self.store.read(PRIMARY_SAVE_KEY)? {
            match decode(&current) {
                Ok(_) => self.store.write(BACKUP_SAVE_KEY, &current)?,
                Err(err) => warn!(error = %err, "primary save is corrupt, keeping existing backup"),
            }
        }

        self.store.write(PRIMARY_SAVE_KEY, &bytes)?;
        info!(
            level = data.player.level,
            gold = data.player.gold,
            play_time = data.total_play_time_secs,
            "game saved"
        );
        Ok(())
    }

    /// Loads the primary slot, falling back to the backup and then to `fresh`.
    ///
    /// A recovered backup is copied back over the primary. A fresh save is
    /// persisted immediately. Never fails.
    pub fn load(&mut self, fresh: impl FnOnce() -> SaveData) -> LoadOutcome {
        match self.read_slot(PRIMARY_SAVE_KEY) {
            Ok(Some(data)) => {
                info!(level = data.player.level, "save loaded");
                return LoadOutcome {
                    data,
                    source: LoadSource::Primary,
                };
            }
            Ok(None) => info!("no primary save"),
            Err(err) => warn!(error = %err, "primary save unreadable, trying backup"),
        }

        match self.store.read(BACKUP_SAVE_KEY) {
            Ok(Some(bytes)) => match decode(&bytes) {
                Ok(data) => {
                    if let Err(err) = self.store.write(PRIMARY_SAVE_KEY, &bytes) {
                        warn!(error = %err, "could not restore primary from backup");
                    }
                    warn!(level = data.player.level, "restored save from backup");
                    return LoadOutcome {
                        data,
                        source: LoadSource::Backup,
                    };
                }
                Err(err) => warn!(error = %err, "backup save unreadable"),
            },
            Ok(None) => {}
            Err(err) => warn!(error = %err, "backup save unreadable"),
        }

        let data = fresh();
        if let Err(err) = self.store.write(PRIMARY_SAVE_KEY, &encode_or_empty(&data)) {
            error!(error = %err, "failed to persist fresh save");
        }
        info!("created fresh save");
        LoadOutcome {
            data,
            source: LoadSource::Fresh,
        }
    }

    /// Clears both slots and writes a fresh save.
    pub fn delete_save(&mut self, fresh: impl FnOnce() -> SaveData) -> Result<SaveData, SaveError> {
        self.store.remove(PRIMARY_SAVE_KEY)?;
        self.store.remove(BACKUP_SAVE_KEY)?;
        let data = fresh();
        self.store.write(PRIMARY_SAVE_KEY, &encode(&data)?)?;
        info!("save deleted and reinitialized");
        Ok(data)
    }

    fn read_slot(&self, key: &str) -> Result<Option<SaveData>, SaveError> {
        match self.store.read(key)? {
            Some(bytes) => decode(&bytes).map(Some),
            None => Ok(None),
        }
    }
}

fn encode_or_empty(data: &SaveData) -> Vec<u8> {
    encode(data).unwrap_or_else(|err| {
        error!(error = %err, "failed to encode save");
        Vec::new()
    })
}
