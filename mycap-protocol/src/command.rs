//! Command table and dispatcher
//!
//! The first token of a frame names the command. Each command declares how
//! many arguments it needs; all of them are extracted before its handler
//! runs, so a short command has no effect at all.
//!
//! Handlers receive the collaborator context `C` explicitly. Nothing is
//! ever written back to the transport.

use heapless::Vec;
use mycap_hal::NetworkLink;

use crate::frame::CommandFrame;
use crate::token::{Token, Tokenizer};

/// Maximum number of arguments a command may declare
pub const MAX_ARGS: usize = 8;

/// Name of the network association command
pub const WIFI: &str = "WIFI";

/// Longest accepted SSID in bytes (802.11 limit)
pub const MAX_SSID_LEN: usize = 32;

/// Longest accepted WPA passphrase or raw PSK in bytes
pub const MAX_PASSPHRASE_LEN: usize = 64;

/// Errors a handler can report for a fully parsed command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Argument is not valid UTF-8 or has an invalid value
    InvalidArgument,
    /// Argument exceeds its maximum length
    ArgumentTooLong,
    /// The network link refused the request
    Network,
}

impl core::fmt::Display for CommandError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidArgument => f.write_str("invalid argument"),
            Self::ArgumentTooLong => f.write_str("argument too long"),
            Self::Network => f.write_str("network link error"),
        }
    }
}

/// Arguments of a command, in wire order
#[derive(Debug, Clone, Default)]
pub struct Args<'a> {
    tokens: Vec<Token<'a>, MAX_ARGS>,
}

impl<'a> Args<'a> {
    /// Number of arguments
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Check if there are no arguments
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Get argument by index (0-based)
    pub fn get(&self, idx: usize) -> Option<Token<'a>> {
        self.tokens.get(idx).copied()
    }

    /// Get argument by index as UTF-8 text
    pub fn str(&self, idx: usize) -> Result<&'a str, CommandError> {
        self.get(idx)
            .and_then(|t| t.as_str())
            .ok_or(CommandError::InvalidArgument)
    }

    /// Iterate over all arguments
    pub fn iter(&self) -> impl Iterator<Item = Token<'a>> + '_ {
        self.tokens.iter().copied()
    }
}

/// Command handler signature
pub type Handler<C> = fn(&mut C, &Args<'_>) -> Result<(), CommandError>;

/// Command descriptor
pub struct CommandDescriptor<C> {
    /// Exact, case-sensitive command name
    pub name: &'static str,
    /// Number of required arguments
    pub arity: usize,
    pub handler: Handler<C>,
}

impl<C> CommandDescriptor<C> {
    /// Create a command descriptor
    pub const fn new(name: &'static str, arity: usize, handler: Handler<C>) -> Self {
        Self {
            name,
            arity,
            handler,
        }
    }
}

// Manual impls: deriving would needlessly require `C: Clone`
impl<C> Clone for CommandDescriptor<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for CommandDescriptor<C> {}

impl<C> core::fmt::Debug for CommandDescriptor<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

/// What happened to a dispatched frame
///
/// Only meant for local logging; the sender never learns about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchOutcome {
    /// Handler ran and succeeded
    Executed,
    /// No command name could be extracted
    Malformed,
    /// Command name not in the table
    Unknown,
    /// Fewer arguments than the command requires
    MissingArguments,
    /// Handler rejected the arguments or its collaborator failed
    Rejected(CommandError),
}

impl DispatchOutcome {
    /// Check if the command produced its effect
    pub fn is_executed(&self) -> bool {
        matches!(self, DispatchOutcome::Executed)
    }
}

/// Maps command names to handlers
pub struct Dispatcher<'t, C> {
    commands: &'t [CommandDescriptor<C>],
}

impl<'t, C> Dispatcher<'t, C> {
    /// Create a dispatcher over a command table
    pub const fn new(commands: &'t [CommandDescriptor<C>]) -> Self {
        Self { commands }
    }

    /// Look up a command by its exact name
    pub fn find(&self, name: &[u8]) -> Option<&'t CommandDescriptor<C>> {
        self.commands.iter().find(|c| c.name.as_bytes() == name)
    }

    /// Get all command names
    pub fn command_names(&self) -> impl Iterator<Item = &'static str> + 't {
        self.commands.iter().map(|c| c.name)
    }

    /// Dispatch one received frame
    pub fn dispatch(&self, frame: &CommandFrame, ctx: &mut C) -> DispatchOutcome {
        self.dispatch_tokens(frame.tokens(), ctx)
    }

    /// Dispatch a command from a token stream
    ///
    /// Tokens past the command's arity are ignored.
    pub fn dispatch_tokens(&self, mut tokens: Tokenizer<'_>, ctx: &mut C) -> DispatchOutcome {
        let Some(name) = tokens.next_token() else {
            return DispatchOutcome::Malformed;
        };

        let Some(command) = self.find(name.as_bytes()) else {
            return DispatchOutcome::Unknown;
        };

        let mut args = Args::default();
        for _ in 0..command.arity {
            let Some(token) = tokens.next_token() else {
                return DispatchOutcome::MissingArguments;
            };
            // Arity above MAX_ARGS can never be satisfied
            if args.tokens.push(token).is_err() {
                return DispatchOutcome::MissingArguments;
            }
        }

        match (command.handler)(ctx, &args) {
            Ok(()) => DispatchOutcome::Executed,
            Err(e) => DispatchOutcome::Rejected(e),
        }
    }
}

/// `WIFI <ssid> <password>` descriptor
pub const fn wifi_command<C: NetworkLink>() -> CommandDescriptor<C> {
    CommandDescriptor::new(WIFI, 2, cmd_wifi::<C>)
}

/// Table of all built-in commands
pub const fn builtin_commands<C: NetworkLink>() -> [CommandDescriptor<C>; 1] {
    [wifi_command()]
}

// --- Command Implementations ---

fn cmd_wifi<C: NetworkLink>(link: &mut C, args: &Args<'_>) -> Result<(), CommandError> {
    let ssid = args.str(0)?;
    let password = args.str(1)?;

    if ssid.is_empty() {
        return Err(CommandError::InvalidArgument);
    }
    if ssid.len() > MAX_SSID_LEN || password.len() > MAX_PASSPHRASE_LEN {
        return Err(CommandError::ArgumentTooLong);
    }

    link.associate(ssid, password).map_err(|_| CommandError::Network)
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::String;

    /// Network link that records association requests
    #[derive(Default)]
    struct RecordingLink {
        calls: Vec<(String<MAX_SSID_LEN>, String<MAX_PASSPHRASE_LEN>), 4>,
        refuse: bool,
    }

    impl NetworkLink for RecordingLink {
        type Error = ();

        fn associate(&mut self, ssid: &str, password: &str) -> Result<(), ()> {
            if self.refuse {
                return Err(());
            }
            let mut s = String::new();
            s.push_str(ssid)?;
            let mut p = String::new();
            p.push_str(password)?;
            self.calls.push((s, p)).map_err(|_| ())
        }
    }

    fn dispatch_line(line: &[u8], link: &mut RecordingLink) -> DispatchOutcome {
        let commands = builtin_commands::<RecordingLink>();
        let dispatcher = Dispatcher::new(&commands);
        let frame = CommandFrame::from_line(line).unwrap();
        dispatcher.dispatch(&frame, link)
    }

    #[test]
    fn test_wifi_associates_once() {
        let mut link = RecordingLink::default();
        let outcome = dispatch_line(b"WIFI\0ssid1\0pass1", &mut link);

        assert_eq!(outcome, DispatchOutcome::Executed);
        assert_eq!(link.calls.len(), 1);
        assert_eq!(link.calls[0].0.as_str(), "ssid1");
        assert_eq!(link.calls[0].1.as_str(), "pass1");
    }

    #[test]
    fn test_wifi_with_trailing_null() {
        let mut link = RecordingLink::default();
        let outcome = dispatch_line(b"WIFI\0myssid\0mypassword\0", &mut link);

        assert!(outcome.is_executed());
        assert_eq!(link.calls[0].0.as_str(), "myssid");
        assert_eq!(link.calls[0].1.as_str(), "mypassword");
    }

    #[test]
    fn test_wifi_missing_password() {
        let mut link = RecordingLink::default();
        let outcome = dispatch_line(b"WIFI\0ssid1", &mut link);

        assert_eq!(outcome, DispatchOutcome::MissingArguments);
        assert!(link.calls.is_empty());
    }

    #[test]
    fn test_wifi_without_arguments() {
        let mut link = RecordingLink::default();
        assert_eq!(
            dispatch_line(b"WIFI", &mut link),
            DispatchOutcome::MissingArguments
        );
        assert!(link.calls.is_empty());
    }

    #[test]
    fn test_command_name_is_case_sensitive() {
        let mut link = RecordingLink::default();
        assert_eq!(
            dispatch_line(b"wifi\0ssid1\0pass1", &mut link),
            DispatchOutcome::Unknown
        );
        assert!(link.calls.is_empty());
    }

    #[test]
    fn test_unknown_command_ignored() {
        let mut link = RecordingLink::default();
        assert_eq!(
            dispatch_line(b"REBOOT\0now", &mut link),
            DispatchOutcome::Unknown
        );
        assert!(link.calls.is_empty());
    }

    #[test]
    fn test_extra_arguments_ignored() {
        let mut link = RecordingLink::default();
        let outcome = dispatch_line(b"WIFI\0a\0b\0c\0d", &mut link);

        assert!(outcome.is_executed());
        assert_eq!(link.calls.len(), 1);
        assert_eq!(link.calls[0].1.as_str(), "b");
    }

    #[test]
    fn test_ssid_too_long_rejected() {
        let mut line: Vec<u8, 64> = Vec::new();
        line.extend_from_slice(b"WIFI\0").unwrap();
        line.extend_from_slice(&[b'S'; MAX_SSID_LEN + 1]).unwrap();
        line.extend_from_slice(b"\0pw").unwrap();

        let mut link = RecordingLink::default();
        assert_eq!(
            dispatch_line(&line, &mut link),
            DispatchOutcome::Rejected(CommandError::ArgumentTooLong)
        );
        assert!(link.calls.is_empty());
    }

    #[test]
    fn test_non_utf8_ssid_rejected() {
        let mut link = RecordingLink::default();
        assert_eq!(
            dispatch_line(b"WIFI\0\xff\xfe\0pw", &mut link),
            DispatchOutcome::Rejected(CommandError::InvalidArgument)
        );
        assert!(link.calls.is_empty());
    }

    #[test]
    fn test_network_refusal_reported() {
        let mut link = RecordingLink {
            refuse: true,
            ..Default::default()
        };
        assert_eq!(
            dispatch_line(b"WIFI\0ssid1\0pass1", &mut link),
            DispatchOutcome::Rejected(CommandError::Network)
        );
    }

    #[test]
    fn test_unterminated_command_name() {
        let commands = builtin_commands::<RecordingLink>();
        let dispatcher = Dispatcher::new(&commands);
        let mut link = RecordingLink::default();

        let outcome = dispatcher.dispatch_tokens(Tokenizer::new(b"WIFI"), &mut link);
        assert_eq!(outcome, DispatchOutcome::Malformed);
    }

    /// Context for a table extended with a custom command
    #[derive(Default)]
    struct Counter {
        hits: u32,
        last_arity: usize,
    }

    fn cmd_count(ctx: &mut Counter, args: &Args<'_>) -> Result<(), CommandError> {
        ctx.hits += 1;
        ctx.last_arity = args.len();
        Ok(())
    }

    #[test]
    fn test_custom_commands() {
        let commands = [
            CommandDescriptor::new("PING", 0, cmd_count),
            CommandDescriptor::new("SET", 3, cmd_count),
        ];
        let dispatcher = Dispatcher::new(&commands);
        let mut ctx = Counter::default();

        let frame = CommandFrame::from_line(b"PING").unwrap();
        assert!(dispatcher.dispatch(&frame, &mut ctx).is_executed());

        let frame = CommandFrame::from_line(b"SET\0a\0b").unwrap();
        assert_eq!(
            dispatcher.dispatch(&frame, &mut ctx),
            DispatchOutcome::MissingArguments
        );

        let frame = CommandFrame::from_line(b"SET\0a\0b\0c").unwrap();
        assert!(dispatcher.dispatch(&frame, &mut ctx).is_executed());

        assert_eq!(ctx.hits, 2);
        assert_eq!(ctx.last_arity, 3);

        let names: Vec<&str, 2> = dispatcher.command_names().collect();
        assert_eq!(&names[..], &["PING", "SET"]);
    }

    #[test]
    fn test_arity_above_limit_never_runs() {
        let commands = [CommandDescriptor::new("MANY", MAX_ARGS + 1, cmd_count)];
        let dispatcher = Dispatcher::new(&commands);
        let mut ctx = Counter::default();

        let frame = CommandFrame::from_line(b"MANY\01\02\03\04\05\06\07\08\09\0").unwrap();
        assert_eq!(
            dispatcher.dispatch(&frame, &mut ctx),
            DispatchOutcome::MissingArguments
        );
        assert_eq!(ctx.hits, 0);
    }
}
