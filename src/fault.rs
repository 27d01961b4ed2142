//! Raised faults and the call frames that led to them
//!
//! A [`Fault`] is the structured form of anything that escaped normal
//! control flow: an `Err` nobody handled, or a panic. It records the fault's
//! message, the place it was raised, and a list of [`Frame`]s captured from
//! the call stack. Each frame field is optional, because backtraces do not
//! always know the file, owning type or arguments of a call.
//!
//! Frames are stored innermost-first (raise site first), the order a
//! backtrace produces them. [`render_frames`] prints them the other way
//! round so the trace reads chronologically.
//!
//! # Examples
//!
//! ```
//! use backwater::fault::{CallKind, Fault, Frame, Location, render_frames};
//!
//! let fault = Fault::from_parts(
//!     "connection refused",
//!     Some(Location::new("src/db.rs", 42)),
//!     vec![
//!         Frame::new("connect")
//!             .at("src/db.rs", 42)
//!             .owned_by("db::Pool")
//!             .kind(CallKind::Instance),
//!         Frame::new("main").at("src/main.rs", 7),
//!     ],
//! );
//!
//! let trace = render_frames(&fault, "");
//! let main_at = trace.find("main.rs").unwrap();
//! let connect_at = trace.find("db.rs").unwrap();
//! assert!(main_at < connect_at);
//! ```

use std::any::Any;
use std::backtrace::Backtrace;
use std::cell::{Cell, RefCell};
use std::error::Error as StdError;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

thread_local! {
    static CATCHING: Cell<bool> = const { Cell::new(false) };
    static PANIC_SITE: RefCell<Option<PanicSite>> = const { RefCell::new(None) };
}

static PANIC_HOOK: Once = Once::new();

/// Raise site recorded by the panic hook before the stack unwinds.
struct PanicSite {
    location: Option<Location>,
    frames: Vec<Frame>,
}

/// A source position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    file: String,
    line: u32,
}

impl Location {
    /// Create a location from a file path and a line number.
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Location {
            file: file.into(),
            line,
        }
    }

    /// The location of the caller, following `#[track_caller]` chains.
    #[track_caller]
    pub fn caller() -> Self {
        let caller = std::panic::Location::caller();
        Location::new(caller.file(), caller.line())
    }

    /// The file path.
    pub fn file(&self) -> &str {
        &self.file
    }

    /// The 1-based line number.
    pub fn line(&self) -> u32 {
        self.line
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// How a frame's symbol was invoked on its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    /// Associated call on the owning type, rendered `::`.
    Static,
    /// Call on a receiver value, rendered `->`.
    Instance,
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallKind::Static => f.write_str("::"),
            CallKind::Instance => f.write_str("->"),
        }
    }
}

/// One call on the path to a fault.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    location: Option<Location>,
    owner: Option<String>,
    symbol: String,
    kind: Option<CallKind>,
    args: Vec<String>,
    receiver: Option<String>,
}

impl Frame {
    /// A frame for `symbol` with every optional field unset.
    pub fn new(symbol: impl Into<String>) -> Self {
        Frame {
            symbol: symbol.into(),
            ..Frame::default()
        }
    }

    /// Set the source location.
    pub fn at(mut self, file: impl Into<String>, line: u32) -> Self {
        self.location = Some(Location::new(file, line));
        self
    }

    /// Set the owning type or module path.
    pub fn owned_by(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Set the invocation kind.
    pub fn kind(mut self, kind: CallKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Set the rendered argument list.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Set the rendered receiver value.
    pub fn with_receiver(mut self, receiver: impl Into<String>) -> Self {
        self.receiver = Some(receiver.into());
        self
    }

    /// Source location, if known.
    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    /// Owning type or module path, if known.
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    /// The called function or method name.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Invocation kind, if known.
    pub fn call_kind(&self) -> Option<CallKind> {
        self.kind
    }

    /// Rendered arguments.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Rendered receiver, if recorded.
    pub fn receiver(&self) -> Option<&str> {
        self.receiver.as_deref()
    }

    /// Parse a demangled backtrace symbol such as `app::db::Pool::connect`.
    ///
    /// The last path segment becomes the symbol, the rest the owner. The
    /// compiler hash suffix is dropped. A symbol alone does not say how it
    /// was called, so the kind stays unset.
    pub fn from_symbol(raw: &str) -> Self {
        let raw = strip_hash(raw.trim());
        match split_owner(raw) {
            Some((owner, symbol)) => Frame::new(symbol).owned_by(owner),
            None => Frame::new(raw),
        }
    }
}

/// Anything that can be written to the log as a fault trace.
pub trait Traceable {
    /// The top-level message.
    fn message(&self) -> String;

    /// Where the fault was raised, if known.
    fn location(&self) -> Option<&Location>;

    /// Captured frames, innermost (raise site) first.
    fn frames(&self) -> &[Frame];
}

/// A captured fault with its trace.
///
/// ```
/// use backwater::Fault;
///
/// let fault = Fault::new("disk full");
/// assert_eq!(fault.to_string(), "disk full");
/// assert!(fault.location().unwrap().file().ends_with(".rs"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    message: String,
    location: Option<Location>,
    frames: Vec<Frame>,
}

impl Fault {
    /// Capture a fault at the caller with a fresh backtrace.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        Fault {
            message: message.into(),
            location: Some(Location::caller()),
            frames: capture_frames(),
        }
    }

    /// Build a fault from already known parts, without capturing anything.
    pub fn from_parts(
        message: impl Into<String>,
        location: Option<Location>,
        frames: Vec<Frame>,
    ) -> Self {
        Fault {
            message: message.into(),
            location,
            frames,
        }
    }

    /// Capture an error and its `source()` chain.
    ///
    /// ```
    /// use backwater::Fault;
    ///
    /// let io = std::io::Error::other("permission denied");
    /// let fault = Fault::from_error(&io);
    /// assert_eq!(fault.to_string(), "permission denied");
    /// ```
    #[track_caller]
    pub fn from_error(error: &(dyn StdError + '_)) -> Self {
        let mut message = error.to_string();
        let mut source = error.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        Fault::new(message)
    }

    /// Build a fault from a panic payload as returned by
    /// `std::panic::catch_unwind`.
    ///
    /// The stack is already unwound once a payload is in hand, so no frames
    /// are captured here. [`catch_panic`] records them at the raise site.
    pub fn from_panic(payload: &(dyn Any + Send), location: Option<Location>) -> Self {
        let message = if let Some(text) = payload.downcast_ref::<&str>() {
            (*text).to_string()
        } else if let Some(text) = payload.downcast_ref::<String>() {
            text.clone()
        } else {
            "panic with non-string payload".to_string()
        };
        Fault::from_parts(message, location, Vec::new())
    }

    /// Replace the raise location.
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Replace the captured frames.
    pub fn with_frames(mut self, frames: Vec<Frame>) -> Self {
        self.frames = frames;
        self
    }

    /// Append a frame further out in the call chain.
    pub fn push_frame(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    /// Where the fault was raised, if known.
    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    /// Captured frames, innermost first.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for Fault {}

impl Traceable for Fault {
    fn message(&self) -> String {
        self.message.clone()
    }

    fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    fn frames(&self) -> &[Frame] {
        &self.frames
    }
}

/// Render frames outermost-first, two lines per frame plus an optional
/// receiver line, each line prefixed with `pad`.
///
/// ```
/// use backwater::fault::{Fault, Frame, render_frames};
///
/// let fault = Fault::from_parts("boom", None, vec![Frame::new("run").with_args(["1", "2"])]);
/// assert_eq!(render_frames(&fault, ""), " • @unknown\n • run(1, 2)\n\n");
/// ```
pub fn render_frames(fault: &dyn Traceable, pad: &str) -> String {
    let mut out = String::new();
    for frame in fault.frames().iter().rev() {
        match frame.location() {
            Some(location) => out.push_str(&format!("{pad} • @{location}\n")),
            None => out.push_str(&format!("{pad} • @unknown\n")),
        }

        out.push_str(&format!("{pad} • "));
        if let Some(kind) = frame.call_kind() {
            out.push_str(&format!("{kind} "));
        }
        if let Some(owner) = frame.owner() {
            out.push_str(&format!("{owner}::"));
        }
        out.push_str(frame.symbol());
        if !frame.args().is_empty() {
            out.push_str(&format!("({})", frame.args().join(", ")));
        }
        if let Some(receiver) = frame.receiver() {
            out.push_str(&format!("\n{pad} • {receiver}"));
        }
        out.push_str("\n\n");
    }
    out
}

/// Run `operation`, turning a panic into a [`Fault`].
///
/// The fault carries the location of the `panic!` and the frames that led
/// to it, recorded by a panic hook before the stack unwinds. While the
/// operation runs on this thread the default panic message is not printed;
/// panics elsewhere still reach the previously installed hook.
///
/// ```
/// use backwater::fault::catch_panic;
///
/// let fault = catch_panic(|| -> u8 { panic!("overheated") }).unwrap_err();
/// assert_eq!(fault.to_string(), "overheated");
/// assert!(fault.location().is_some());
/// ```
pub fn catch_panic<R, F>(operation: F) -> Result<R, Fault>
where
    F: FnOnce() -> R,
{
    install_panic_hook();
    let outer = CATCHING.replace(true);
    let result = panic::catch_unwind(AssertUnwindSafe(operation));
    CATCHING.set(outer);

    result.map_err(|payload| match PANIC_SITE.take() {
        Some(site) => Fault::from_panic(payload.as_ref(), site.location).with_frames(site.frames),
        None => Fault::from_panic(payload.as_ref(), None),
    })
}

fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if CATCHING.get() {
                let site = PanicSite {
                    location: info
                        .location()
                        .map(|at| Location::new(at.file(), at.line())),
                    frames: capture_frames(),
                };
                PANIC_SITE.set(Some(site));
            } else {
                previous(info);
            }
        }));
    });
}

fn capture_frames() -> Vec<Frame> {
    parse_backtrace(&Backtrace::force_capture().to_string())
        .into_iter()
        .filter(|frame| !is_capture_machinery(frame) && !is_runtime_frame(frame))
        .collect()
}

fn is_capture_machinery(frame: &Frame) -> bool {
    const CAPTURE_OWNERS: [&str; 4] = [
        "backwater::fault::Fault",
        "backwater::fault::catch_panic",
        "backwater::fault::install_panic_hook",
        "<backwater::fault::Fault",
    ];

    frame.owner().is_some_and(|owner| {
        owner == "backwater::fault" || CAPTURE_OWNERS.iter().any(|prefix| owner.starts_with(prefix))
    })
}

/// Frames from the standard library, the panic runtime and process startup.
fn is_runtime_frame(frame: &Frame) -> bool {
    const RUNTIME_OWNERS: [&str; 7] = [
        "std::", "core::", "alloc::", "__rustc", "<std::", "<core::", "<alloc::",
    ];
    const RUNTIME_SYMBOLS: [&str; 5] = ["__rust", "rust_begin_unwind", "_start", "__libc", "start_thread"];

    match frame.owner() {
        Some(owner) => RUNTIME_OWNERS.iter().any(|prefix| owner.starts_with(prefix)),
        None => RUNTIME_SYMBOLS
            .iter()
            .any(|prefix| frame.symbol().starts_with(prefix)),
    }
}

/// Parse the `Display` form of a `std::backtrace::Backtrace`.
///
/// Frame headers look like `  3: path::to::symbol` and are optionally
/// followed by `        at file.rs:12:5`.
pub(crate) fn parse_backtrace(text: &str) -> Vec<Frame> {
    let mut frames: Vec<Frame> = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if let Some(position) = line.strip_prefix("at ") {
            if let (Some(frame), Some(location)) = (frames.last_mut(), parse_location(position)) {
                if frame.location.is_none() {
                    frame.location = Some(location);
                }
            }
        } else if let Some((index, symbol)) = line.split_once(": ") {
            if index.chars().all(|c| c.is_ascii_digit()) && !index.is_empty() {
                frames.push(Frame::from_symbol(symbol));
            }
        }
    }
    frames
}

fn parse_location(position: &str) -> Option<Location> {
    let mut parts = position.rsplitn(3, ':');
    let last = parts.next()?;
    let middle = parts.next()?;
    match parts.next() {
        // file:line:column
        Some(file) => Some(Location::new(file, middle.parse().ok()?)),
        // file:line
        None => Some(Location::new(middle, last.parse().ok()?)),
    }
}

fn strip_hash(symbol: &str) -> &str {
    match symbol.rsplit_once("::h") {
        Some((head, hash)) if hash.len() == 16 && hash.chars().all(|c| c.is_ascii_hexdigit()) => {
            head
        }
        _ => symbol,
    }
}

/// Split `owner::symbol` at the last `::` outside generic brackets.
fn split_owner(path: &str) -> Option<(&str, &str)> {
    let mut depth = 0usize;
    let mut split = None;
    let bytes = path.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'<' => depth += 1,
            b'>' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => {
                split = Some(i);
                i += 1;
            }
            _ => {}
        }
        i += 1;
    }
    split
        .map(|at| (&path[..at], &path[at + 2..]))
        .filter(|(owner, symbol)| !owner.is_empty() && !symbol.is_empty())
}
