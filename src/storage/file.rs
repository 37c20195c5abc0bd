use crate::config::Config;
use crate::error::{Error, Result};
use crate::state::State;
use crate::storage::Storage;
use crate::tx::SignedTx;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, Read, Write};
use std::path::PathBuf;

/// File-based storage using an append-only log and snapshots.
///
/// Files:
/// - `tx.log`: Append-only transaction log (length-prefixed bincode)
/// - `state.bin`: State snapshot (bincode State + u64 last_tx_id)
/// - `state.bin.tmp`: Temporary file for atomic snapshot writes
pub struct FileStorage {
    tx_log_path: PathBuf,
    state_path: PathBuf,
    state_tmp_path: PathBuf,
}

impl FileStorage {
    /// Create a new FileStorage with paths from config
    pub fn new(config: &Config) -> Self {
        FileStorage {
            tx_log_path: config.get_tx_log_path(),
            state_path: config.get_state_path(),
            state_tmp_path: config.get_state_path().with_extension("bin.tmp"),
        }
    }

    /// Create FileStorage with custom paths (for testing)
    pub fn with_paths(tx_log_path: PathBuf, state_path: PathBuf) -> Self {
        let state_tmp_path = state_path.with_extension("bin.tmp");
        FileStorage {
            tx_log_path,
            state_path,
            state_tmp_path,
        }
    }

    /// Ensure the data directory exists
    fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.tx_log_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Storage(format!("Failed to create data directory: {}", e)))?;
        }
        Ok(())
    }
}

impl Storage for FileStorage {
    fn append_tx(&mut self, tx: &SignedTx) -> Result<()> {
        self.ensure_dir()?;

        let tx_bytes = bincode::serialize(tx)
            .map_err(|e| Error::Storage(format!("Failed to serialize transaction: {}", e)))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.tx_log_path)
            .map_err(|e| Error::Storage(format!("Failed to open tx log for append: {}", e)))?;

        // Length prefix (u64 little-endian) + transaction data
        let len = tx_bytes.len() as u64;
        file.write_all(&len.to_le_bytes())
            .map_err(|e| Error::Storage(format!("Failed to write tx length: {}", e)))?;
        file.write_all(&tx_bytes)
            .map_err(|e| Error::Storage(format!("Failed to write tx data: {}", e)))?;

        // Fsync for crash safety (append-only semantics)
        file.sync_all()
            .map_err(|e| Error::Storage(format!("Failed to fsync tx log: {}", e)))?;

        Ok(())
    }

    fn load_state(&self) -> Result<Option<(State, u64)>> {
        if !self.state_path.exists() {
            return Ok(None);
        }

        let mut file = File::open(&self.state_path)
            .map_err(|e| Error::Storage(format!("Failed to open state file: {}", e)))?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)
            .map_err(|e| Error::Storage(format!("Failed to read state file: {}", e)))?;

        // Format: [State bytes][last_tx_id: u64]
        if data.len() < 8 {
            return Err(Error::Storage("State file too short".to_string()));
        }

        let last_tx_id_bytes = &data[data.len() - 8..];
        let mut id_buf = [0u8; 8];
        id_buf.copy_from_slice(last_tx_id_bytes);
        let last_tx_id = u64::from_le_bytes(id_buf);

        let state_bytes = &data[..data.len() - 8];
        let state: State = bincode::deserialize(state_bytes)
            .map_err(|e| Error::Storage(format!("Failed to deserialize state: {}", e)))?;

        Ok(Some((state, last_tx_id)))
    }

    fn persist_state(&mut self, state: &State, last_tx_id: u64) -> Result<()> {
        self.ensure_dir()?;

        let state_bytes = bincode::serialize(state)
            .map_err(|e| Error::Storage(format!("Failed to serialize state: {}", e)))?;

        let mut file = File::create(&self.state_tmp_path)
            .map_err(|e| Error::Storage(format!("Failed to create temp state file: {}", e)))?;

        file.write_all(&state_bytes)
            .map_err(|e| Error::Storage(format!("Failed to write state: {}", e)))?;
        file.write_all(&last_tx_id.to_le_bytes())
            .map_err(|e| Error::Storage(format!("Failed to write last_tx_id: {}", e)))?;

        // Fsync before rename (crash safety)
        file.sync_all()
            .map_err(|e| Error::Storage(format!("Failed to fsync temp state file: {}", e)))?;
        drop(file);

        // Atomic rename (crash-safe snapshot)
        fs::rename(&self.state_tmp_path, &self.state_path)
            .map_err(|e| Error::Storage(format!("Failed to rename temp state file: {}", e)))?;

        // Fsync parent directory (ensure rename is persisted)
        if let Some(parent) = self.state_path.parent() {
            let parent_file = File::open(parent)
                .map_err(|e| Error::Storage(format!("Failed to open parent directory: {}", e)))?;
            parent_file
                .sync_all()
                .map_err(|e| Error::Storage(format!("Failed to fsync parent directory: {}", e)))?;
        }

        Ok(())
    }

    fn load_txs_from(&self, from_tx_id: u64) -> Result<Vec<SignedTx>> {
        if !self.tx_log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.tx_log_path)
            .map_err(|e| Error::Storage(format!("Failed to open tx log: {}", e)))?;
        let mut reader = BufReader::new(file);

        let mut transactions = Vec::new();
        let mut current_id = 0u64;

        loop {
            let mut len_buf = [0u8; 8];
            match reader.read_exact(&mut len_buf) {
                Ok(_) => {
                    let len = u64::from_le_bytes(len_buf) as usize;
                    let mut tx_buf = vec![0u8; len];
                    reader
                        .read_exact(&mut tx_buf)
                        .map_err(|e| Error::Storage(format!("Failed to read tx data: {}", e)))?;

                    if current_id >= from_tx_id {
                        let tx: SignedTx = bincode::deserialize(&tx_buf).map_err(|e| {
                            Error::Storage(format!("Failed to deserialize tx: {}", e))
                        })?;
                        transactions.push(tx);
                    }

                    current_id += 1;
                }
                Err(ref e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    break;
                }
                Err(e) => {
                    return Err(Error::Storage(format!("Failed to read tx log: {}", e)));
                }
            }
        }

        Ok(transactions)
    }
}
