use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, warn};

use warehouse_types::{unix_now, ExpiryPolicy, FromValue, Tier, Value};

use crate::diagnostics::{self, DiagnosticHook};
use crate::envelope::Envelope;
use crate::error::{StoreError, StoreResult};
use crate::paths::{entry_path, tier_dir, PathProvider, PlatformPaths, NAMESPACE};

/// Where a handle's data lives: a keyed file in a tier, or a value already
/// held in memory. Resolved once at construction, never mixed.
#[derive(Clone, Debug)]
enum Source {
    FileBacked { key: String },
    InMemory(Value),
}

/// Handle to a single keyed value tree.
///
/// A file-backed handle (key + tier) owns one file and supports the full
/// lifecycle: write, load, existence check with lazy expiry, removal. An
/// in-memory handle wraps a value extracted from a parent entry; it never
/// touches the filesystem, never expires, and cannot be written — only the
/// top-level write persists anything.
///
/// The surface is availability-first: a missing file, a corrupt file, and
/// a failed write all degrade to "no data". Use
/// [`try_write`](Self::try_write) or a [`DiagnosticHook`] when the cause
/// matters.
#[derive(Clone)]
pub struct Warehouse {
    source: Source,
    tier: Tier,
    paths: Arc<dyn PathProvider>,
    diagnostics: Option<DiagnosticHook>,
}

impl Warehouse {
    /// File-backed handle over the platform directories.
    pub fn open(key: impl Into<String>, tier: Tier) -> Self {
        Self::with_provider(key, tier, Arc::new(PlatformPaths))
    }

    /// File-backed handle over an explicit path provider.
    pub fn with_provider(
        key: impl Into<String>,
        tier: Tier,
        paths: Arc<dyn PathProvider>,
    ) -> Self {
        Self {
            source: Source::FileBacked { key: key.into() },
            tier,
            paths,
            diagnostics: None,
        }
    }

    /// In-memory handle over an already-loaded value.
    ///
    /// The tier is retained so nested handles stay attributable to their
    /// parent's tier; it plays no role in reads.
    pub fn from_value(value: Value, tier: Tier) -> Self {
        Self::from_value_with_provider(value, tier, Arc::new(PlatformPaths))
    }

    /// In-memory handle keeping an explicit path provider for its tier.
    pub fn from_value_with_provider(
        value: Value,
        tier: Tier,
        paths: Arc<dyn PathProvider>,
    ) -> Self {
        Self {
            source: Source::InMemory(value),
            tier,
            paths,
            diagnostics: None,
        }
    }

    /// Attach a hook observing the failures this handle swallows.
    /// Nested handles created by object extraction inherit it.
    pub fn with_diagnostics(mut self, hook: DiagnosticHook) -> Self {
        self.diagnostics = Some(hook);
        self
    }

    /// The retention tier this handle belongs to.
    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// The key, for file-backed handles.
    pub fn key(&self) -> Option<&str> {
        match &self.source {
            Source::FileBacked { key } => Some(key),
            Source::InMemory(_) => None,
        }
    }

    /// The backing file path, for file-backed handles. Constructing the
    /// path ensures the tier directory exists.
    pub fn path(&self) -> Option<PathBuf> {
        match &self.source {
            Source::FileBacked { key } => {
                Some(entry_path(self.paths.as_ref(), self.tier, key))
            }
            Source::InMemory(_) => None,
        }
    }

    fn nested(&self, value: Value) -> Warehouse {
        Warehouse {
            source: Source::InMemory(value),
            tier: self.tier,
            paths: Arc::clone(&self.paths),
            diagnostics: self.diagnostics.clone(),
        }
    }

    fn report(&self, error: &StoreError) {
        diagnostics::report(self.diagnostics.as_ref(), error);
    }

    // ---- Writer ----

    /// Serialize `value` with the resolved expiry and atomically replace
    /// the backing file.
    ///
    /// Best-effort: a validation or I/O failure is logged, reported to the
    /// diagnostics hook, and swallowed, leaving any previous file
    /// untouched.
    pub fn write(&self, value: Value, expiry: ExpiryPolicy) {
        if let Err(error) = self.try_write(value, expiry) {
            self.report(&error);
        }
    }

    /// Strict variant of [`write`](Self::write) returning the cause on
    /// failure. No file is written or modified unless the whole operation
    /// succeeds.
    pub fn try_write(&self, value: Value, expiry: ExpiryPolicy) -> StoreResult<()> {
        let Source::FileBacked { key } = &self.source else {
            return Err(StoreError::NotFileBacked);
        };

        value.ensure_representable()?;
        let envelope = Envelope {
            expires: expiry.resolve(),
            storage: value,
        };
        let bytes = serde_json::to_vec(&envelope)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let dir = tier_dir(self.paths.as_ref(), self.tier);
        let path = dir.join(key);
        // Unique temp file in the target directory, then rename over the
        // entry: a reader sees either the old file or the new one, never a
        // mix, and concurrent writers settle on whoever renames last.
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)
            .map_err(|source| StoreError::Io { path: dir, source })?;
        tmp.write_all(&bytes).map_err(|source| StoreError::Io {
            path: tmp.path().to_path_buf(),
            source,
        })?;
        tmp.persist(&path).map_err(|e| StoreError::Io {
            path: path.clone(),
            source: e.error,
        })?;

        debug!(key = %key, tier = %self.tier, bytes = bytes.len(), "warehouse write");
        Ok(())
    }

    // ---- Loader ----

    /// Load the raw envelope for this handle.
    ///
    /// In-memory handles return their value wrapped as a never-expiring
    /// envelope, without filesystem access. File-backed handles read the
    /// file and try the legacy keyed format, then the current JSON format.
    /// A missing, unreadable, or foreign file is a cache miss (`None`),
    /// never an error. Expiry is *not* evaluated here — a plain load
    /// returns whatever is on disk; see [`exists`](Self::exists).
    pub fn load_envelope(&self) -> Option<Envelope> {
        match &self.source {
            Source::InMemory(value) => Some(Envelope::never(value.clone())),
            Source::FileBacked { key } => {
                let path = entry_path(self.paths.as_ref(), self.tier, key);
                let bytes = match fs::read(&path) {
                    Ok(bytes) => bytes,
                    Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
                    Err(source) => {
                        self.report(&StoreError::Io { path, source });
                        return None;
                    }
                };
                let envelope = Envelope::from_slice(&bytes);
                if envelope.is_none() {
                    debug!(key = %key, tier = %self.tier, "unparseable entry treated as miss");
                }
                envelope
            }
        }
    }

    /// The stored value, regardless of expiry.
    pub fn load(&self) -> Option<Value> {
        self.load_envelope().map(|envelope| envelope.storage)
    }

    // ---- Expiry evaluator ----

    /// Whether this handle currently holds valid data.
    ///
    /// This is the only place expired data is purged: a past-due entry is
    /// deleted as a side effect and reported absent. Entries without an
    /// expiry timestamp — everything written before expiry support, and
    /// every in-memory context — are always valid. A file that exists but
    /// does not parse as an envelope counts as absent, though it is left
    /// in place.
    pub fn exists(&self) -> bool {
        match &self.source {
            Source::InMemory(_) => true,
            Source::FileBacked { key } => {
                let Some(envelope) = self.load_envelope() else {
                    return false;
                };
                if envelope.is_expired_at(unix_now()) {
                    debug!(key = %key, tier = %self.tier, "entry expired; purging");
                    self.remove();
                    return false;
                }
                true
            }
        }
    }

    // ---- Typed extractors ----

    /// Typed primitive fetch from the stored object.
    ///
    /// Looks up `key` in the stored value (which must be an object) and
    /// converts on an exact variant match only — no numeric or string
    /// coercion.
    pub fn get<T: FromValue>(&self, key: &str) -> Option<T> {
        let envelope = self.load_envelope()?;
        T::from_value(envelope.storage.get(key)?)
    }

    /// Typed array fetch.
    ///
    /// `None` when `key` is absent or not an array; otherwise the elements
    /// matching `T`, in order, with mismatches silently dropped. An array
    /// with no matching element yields `Some(vec![])`, not `None`.
    pub fn get_array<T: FromValue>(&self, key: &str) -> Option<Vec<T>> {
        let envelope = self.load_envelope()?;
        let items = envelope.storage.get(key)?.as_array()?;
        Some(items.iter().filter_map(T::from_value).collect())
    }

    /// Fetch `key` as a nested warehouse and apply the caller's factory.
    ///
    /// The value (any shape) is wrapped as an in-memory handle sharing
    /// this handle's tier, provider, and diagnostics. `None` when the key
    /// is absent or the factory declines.
    pub fn get_object<T>(
        &self,
        key: &str,
        factory: impl FnOnce(&Warehouse) -> Option<T>,
    ) -> Option<T> {
        let envelope = self.load_envelope()?;
        let value = envelope.storage.get(key)?.clone();
        factory(&self.nested(value))
    }

    /// Fetch `key` as an array of nested objects.
    ///
    /// `None` when the key is absent or not an array. Object-shaped
    /// elements are wrapped and passed to the factory; other elements, and
    /// elements the factory declines, are silently dropped.
    pub fn get_object_array<T>(
        &self,
        key: &str,
        mut factory: impl FnMut(&Warehouse) -> Option<T>,
    ) -> Option<Vec<T>> {
        let envelope = self.load_envelope()?;
        let items = envelope.storage.get(key)?.as_array()?;
        Some(
            items
                .iter()
                .filter(|item| item.as_object().is_some())
                .filter_map(|item| factory(&self.nested(item.clone())))
                .collect(),
        )
    }

    // ---- Removal ----

    /// Delete the backing file. A missing file is fine; other failures are
    /// logged and reported, never surfaced. No-op for in-memory handles.
    pub fn remove(&self) {
        let Source::FileBacked { key } = &self.source else {
            debug!("remove on in-memory handle ignored");
            return;
        };
        let path = entry_path(self.paths.as_ref(), self.tier, key);
        match fs::remove_file(&path) {
            Ok(()) => debug!(key = %key, tier = %self.tier, "entry removed"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(source) => self.report(&StoreError::Io { path, source }),
        }
    }
}

impl fmt::Debug for Warehouse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Warehouse");
        match &self.source {
            Source::FileBacked { key } => s.field("key", key),
            Source::InMemory(_) => s.field("source", &"in-memory"),
        };
        s.field("tier", &self.tier).finish()
    }
}

/// Recursively delete a tier's entire namespace directory.
///
/// Errors are logged, not surfaced. The other tier is untouched.
pub fn remove_tier(provider: &dyn PathProvider, tier: Tier) {
    let dir = provider.base_dir(tier).join(NAMESPACE);
    match fs::remove_dir_all(&dir) {
        Ok(()) => debug!(%tier, "tier cleared"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!(%tier, dir = %dir.display(), error = %e, "failed to clear tier"),
    }
}

/// Sorted list of entry file names currently present in a tier.
///
/// A directory listing, not a query: expired entries keep appearing until
/// an existence check purges them.
pub fn keys(provider: &dyn PathProvider, tier: Tier) -> Vec<String> {
    let dir = provider.base_dir(tier).join(NAMESPACE);
    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) => {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(%tier, dir = %dir.display(), error = %e, "failed to list tier");
            }
            return Vec::new();
        }
    };
    let mut keys: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    keys.sort();
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, Arc<dyn PathProvider>) {
        let dir = tempfile::tempdir().unwrap();
        let paths: Arc<dyn PathProvider> = Arc::new(crate::paths::FixedPaths::new(dir.path()));
        (dir, paths)
    }

    fn warehouse(paths: &Arc<dyn PathProvider>, key: &str) -> Warehouse {
        Warehouse::with_provider(key, Tier::Permanent, Arc::clone(paths))
    }

    fn value(text: &str) -> Value {
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn round_trip_preserves_structure() {
        let (_dir, paths) = temp_store();
        let w = warehouse(&paths, "profile");
        let stored = value(
            r#"{"name":"ada","tags":["a","b"],"count":3,"ratio":0.5,"nested":{"ok":true,"none":null}}"#,
        );

        w.write(stored.clone(), ExpiryPolicy::Never);
        assert_eq!(w.load(), Some(stored));
    }

    #[test]
    fn primitive_extraction_matches_exactly() {
        let (_dir, paths) = temp_store();
        let w = warehouse(&paths, "entry");
        w.write(
            value(r#"{"count":3,"ratio":2.5,"name":"ada","active":true}"#),
            ExpiryPolicy::Never,
        );

        assert_eq!(w.get::<i64>("count"), Some(3));
        assert_eq!(w.get::<f64>("ratio"), Some(2.5));
        assert_eq!(w.get::<String>("name"), Some("ada".to_owned()));
        assert_eq!(w.get::<bool>("active"), Some(true));

        // No coercion across types, and absent keys are misses.
        assert_eq!(w.get::<f64>("count"), None);
        assert_eq!(w.get::<i64>("ratio"), None);
        assert_eq!(w.get::<String>("count"), None);
        assert_eq!(w.get::<i64>("missing"), None);
    }

    #[test]
    fn array_extraction_filters_in_order() {
        let (_dir, paths) = temp_store();
        let w = warehouse(&paths, "mixed");
        w.write(value(r#"{"xs":[1,"a",2,3.5],"n":7}"#), ExpiryPolicy::Never);

        assert_eq!(w.get_array::<i64>("xs"), Some(vec![1, 2]));
        assert_eq!(w.get_array::<String>("xs"), Some(vec!["a".to_owned()]));
        assert_eq!(w.get_array::<f64>("xs"), Some(vec![3.5]));
        // No matching elements still yields an empty vec, not a miss.
        assert_eq!(w.get_array::<bool>("xs"), Some(Vec::new()));
        // Absent key or non-array value is a miss.
        assert_eq!(w.get_array::<i64>("missing"), None);
        assert_eq!(w.get_array::<i64>("n"), None);
    }

    #[test]
    fn past_expiry_purges_on_exists_only() {
        let (_dir, paths) = temp_store();
        let w = warehouse(&paths, "stale");
        w.write(value(r#"{"a":1}"#), ExpiryPolicy::At(unix_now() - 1));

        // A plain load does not enforce expiry and does not delete.
        assert!(w.load().is_some());
        assert!(w.path().unwrap().exists());

        // The existence check purges.
        assert!(!w.exists());
        assert!(!w.path().unwrap().exists());
        assert_eq!(w.load(), None);
    }

    #[test]
    fn future_expiry_persists() {
        let (_dir, paths) = temp_store();
        let w = warehouse(&paths, "fresh");
        w.write(value(r#"{"a":1}"#), ExpiryPolicy::At(unix_now() + 3600));

        assert!(w.exists());
        assert!(w.exists());
        assert_eq!(w.get::<i64>("a"), Some(1));
    }

    #[test]
    fn ttl_write_persists_until_deadline() {
        let (_dir, paths) = temp_store();
        let w = warehouse(&paths, "ttl");
        w.write(Value::from(1i64), ExpiryPolicy::After(std::time::Duration::from_secs(3600)));
        assert!(w.exists());
    }

    #[test]
    fn expiry_at_now_is_already_expired() {
        let (_dir, paths) = temp_store();
        let w = warehouse(&paths, "edge");
        w.write(Value::from(1i64), ExpiryPolicy::At(unix_now()));
        assert!(!w.exists());
    }

    #[test]
    fn missing_expiry_field_never_expires() {
        let (_dir, paths) = temp_store();
        let w = warehouse(&paths, "pre-expiry");
        fs::write(w.path().unwrap(), br#"{"storage":{"a":1}}"#).unwrap();

        assert!(w.exists());
        assert_eq!(w.get::<i64>("a"), Some(1));
    }

    #[test]
    fn legacy_scalar_file_reads_and_exists() {
        let (_dir, paths) = temp_store();
        let w = warehouse(&paths, "legacy-scalar");
        fs::write(w.path().unwrap(), b"storage = 42\n").unwrap();

        assert!(w.exists());
        assert_eq!(w.load(), Some(Value::Int(42)));
    }

    #[test]
    fn legacy_table_file_supports_typed_reads() {
        let (_dir, paths) = temp_store();
        let w = warehouse(&paths, "legacy-table");
        fs::write(
            w.path().unwrap(),
            b"[storage]\ncount = 42\nname = \"ada\"\n",
        )
        .unwrap();

        assert!(w.exists());
        assert_eq!(w.get::<i64>("count"), Some(42));
        assert_eq!(w.get::<String>("name"), Some("ada".to_owned()));
    }

    #[test]
    fn legacy_file_is_not_upgraded_by_reads() {
        let (_dir, paths) = temp_store();
        let w = warehouse(&paths, "legacy-keep");
        let original = b"storage = 42\n".to_vec();
        fs::write(w.path().unwrap(), &original).unwrap();

        let _ = w.load();
        assert!(w.exists());
        assert_eq!(fs::read(w.path().unwrap()).unwrap(), original);

        // Only a fresh write produces the current format.
        w.write(Value::from(43i64), ExpiryPolicy::Never);
        let rewritten = fs::read(w.path().unwrap()).unwrap();
        assert_eq!(rewritten, br#"{"storage":43}"#.to_vec());
    }

    #[test]
    fn miss_semantics_across_all_reads() {
        let (_dir, paths) = temp_store();
        let w = warehouse(&paths, "absent");

        assert!(!w.exists());
        assert_eq!(w.load(), None);
        assert_eq!(w.load_envelope(), None);
        assert_eq!(w.get::<i64>("a"), None);
        assert_eq!(w.get_array::<i64>("a"), None);
        assert_eq!(w.get_object("a", |nested| nested.load()), None);
        assert_eq!(
            w.get_object_array("a", |nested| nested.load()),
            None
        );
    }

    #[test]
    fn invalid_write_leaves_previous_file_untouched() {
        let (_dir, paths) = temp_store();
        let w = warehouse(&paths, "guarded");
        w.write(value(r#"{"a":1}"#), ExpiryPolicy::Never);

        let bad = Value::Object(
            [("x".to_owned(), Value::Float(f64::NAN))].into(),
        );
        let err = w.try_write(bad, ExpiryPolicy::Never).unwrap_err();
        assert!(matches!(err, StoreError::NotRepresentable(_)));
        assert_eq!(w.get::<i64>("a"), Some(1));
    }

    #[test]
    fn invalid_write_creates_no_file() {
        let (_dir, paths) = temp_store();
        let w = warehouse(&paths, "never-born");
        w.write(Value::Float(f64::INFINITY), ExpiryPolicy::Never);
        assert!(!w.path().unwrap().exists());
    }

    #[test]
    fn tier_isolation_under_remove_tier() {
        let (_dir, paths) = temp_store();
        let permanent = Warehouse::with_provider("shared", Tier::Permanent, Arc::clone(&paths));
        let volatile = Warehouse::with_provider("shared", Tier::Volatile, Arc::clone(&paths));
        permanent.write(Value::from("keep"), ExpiryPolicy::Never);
        volatile.write(Value::from("cache"), ExpiryPolicy::Never);

        remove_tier(paths.as_ref(), Tier::Permanent);

        assert!(!permanent.exists());
        assert_eq!(volatile.load(), Some(Value::from("cache")));
    }

    #[test]
    fn in_memory_context_semantics() {
        let (_dir, paths) = temp_store();
        let context = value(r#"{"name":"nested"}"#);
        let w = Warehouse::from_value_with_provider(
            context.clone(),
            Tier::Permanent,
            Arc::clone(&paths),
        );

        assert!(w.exists());
        assert_eq!(w.load(), Some(context));
        assert_eq!(w.load_envelope().unwrap().expires, None);
        assert_eq!(w.key(), None);
        assert_eq!(w.path(), None);

        // Writing through a context is rejected and persists nothing.
        let seen: Arc<Mutex<Vec<String>>> = Arc::default();
        let sink = Arc::clone(&seen);
        let w = w.with_diagnostics(Arc::new(move |error| {
            sink.lock().unwrap().push(error.to_string());
        }));
        w.write(Value::from(1i64), ExpiryPolicy::Never);

        assert!(keys(paths.as_ref(), Tier::Permanent).is_empty());
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].contains("in-memory"));
    }

    #[test]
    fn nested_object_extraction() {
        let (_dir, paths) = temp_store();
        let w = warehouse(&paths, "owner");
        w.write(
            value(r#"{"owner":{"name":"ada","age":36},"n":5}"#),
            ExpiryPolicy::Never,
        );

        let name = w.get_object("owner", |nested| nested.get::<String>("name"));
        assert_eq!(name, Some("ada".to_owned()));

        // Any value shape can be wrapped; the factory decides.
        assert_eq!(w.get_object("n", |nested| nested.load()), Some(Value::Int(5)));

        // A declining factory is a miss.
        assert_eq!(
            w.get_object("owner", |nested| nested.get::<String>("missing")),
            None
        );
    }

    #[test]
    fn nested_object_array_drops_non_objects_and_failures() {
        let (_dir, paths) = temp_store();
        let w = warehouse(&paths, "pets");
        w.write(
            value(r#"{"pets":[{"name":"rex"},4,{"name":"fido"},{"age":2}],"n":1}"#),
            ExpiryPolicy::Never,
        );

        let names = w.get_object_array("pets", |nested| nested.get::<String>("name"));
        assert_eq!(names, Some(vec!["rex".to_owned(), "fido".to_owned()]));

        assert_eq!(w.get_object_array("n", |nested| nested.load()), None);
        assert_eq!(w.get_object_array("missing", |nested| nested.load()), None);
    }

    #[test]
    fn nested_handles_share_tier() {
        let (_dir, paths) = temp_store();
        let w = Warehouse::with_provider("parent", Tier::Volatile, Arc::clone(&paths));
        w.write(value(r#"{"child":{"a":1}}"#), ExpiryPolicy::Never);

        let tier = w.get_object("child", |nested| Some(nested.tier()));
        assert_eq!(tier, Some(Tier::Volatile));
    }

    #[test]
    fn overwrite_replaces_fully() {
        let (_dir, paths) = temp_store();
        let w = warehouse(&paths, "versioned");
        w.write(value(r#"{"a":1,"b":2}"#), ExpiryPolicy::Never);
        w.write(value(r#"{"a":9}"#), ExpiryPolicy::Never);

        assert_eq!(w.load(), Some(value(r#"{"a":9}"#)));
        assert_eq!(w.get::<i64>("b"), None);
    }

    #[test]
    fn unparseable_file_is_absent_but_kept() {
        let (_dir, paths) = temp_store();
        let w = warehouse(&paths, "foreign");
        fs::write(w.path().unwrap(), b"\x00\x01 not a format").unwrap();

        assert!(!w.exists());
        assert_eq!(w.load(), None);
        // Only a past-due expiry deletes; foreign files stay in place.
        assert!(w.path().unwrap().exists());
    }

    #[test]
    fn diagnostics_hook_observes_validation_failure() {
        let (_dir, paths) = temp_store();
        let seen: Arc<Mutex<Vec<String>>> = Arc::default();
        let sink = Arc::clone(&seen);
        let w = warehouse(&paths, "watched").with_diagnostics(Arc::new(move |error| {
            sink.lock().unwrap().push(error.to_string());
        }));

        w.write(Value::Float(f64::NAN), ExpiryPolicy::Never);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].contains("not representable"));
    }

    #[test]
    fn keys_lists_only_the_tier() {
        let (_dir, paths) = temp_store();
        warehouse(&paths, "beta").write(Value::from(1i64), ExpiryPolicy::Never);
        warehouse(&paths, "alpha").write(Value::from(2i64), ExpiryPolicy::Never);

        assert_eq!(keys(paths.as_ref(), Tier::Permanent), vec!["alpha", "beta"]);
        assert!(keys(paths.as_ref(), Tier::Volatile).is_empty());
    }

    #[test]
    fn remove_is_idempotent() {
        let (_dir, paths) = temp_store();
        let w = warehouse(&paths, "gone");
        w.write(Value::from(1i64), ExpiryPolicy::Never);

        w.remove();
        assert!(!w.exists());
        assert_eq!(w.load(), None);
        // Removing an already-missing entry is fine.
        w.remove();
    }

    #[test]
    fn remove_tier_tolerates_missing_directory() {
        let (_dir, paths) = temp_store();
        remove_tier(paths.as_ref(), Tier::Volatile);
        assert!(keys(paths.as_ref(), Tier::Volatile).is_empty());
    }

    #[test]
    fn written_file_is_a_compact_envelope() {
        let (_dir, paths) = temp_store();
        let w = warehouse(&paths, "shape");
        w.write(value(r#"{"a":1}"#), ExpiryPolicy::Never);

        let raw: serde_json::Value =
            serde_json::from_slice(&fs::read(w.path().unwrap()).unwrap()).unwrap();
        assert!(raw.get("storage").is_some());
        assert!(raw.get("expires").is_none());

        w.write(value(r#"{"a":1}"#), ExpiryPolicy::At(2_000_000_000));
        let raw: serde_json::Value =
            serde_json::from_slice(&fs::read(w.path().unwrap()).unwrap()).unwrap();
        assert_eq!(raw.get("expires").and_then(|e| e.as_u64()), Some(2_000_000_000));
    }

    #[test]
    fn debug_summarizes_without_dumping_values() {
        let (_dir, paths) = temp_store();
        let file_backed = warehouse(&paths, "k");
        assert!(format!("{file_backed:?}").contains("\"k\""));

        let in_memory = Warehouse::from_value(Value::from(1i64), Tier::Volatile);
        assert!(format!("{in_memory:?}").contains("in-memory"));
    }
}
