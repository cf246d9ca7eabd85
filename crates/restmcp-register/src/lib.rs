//! `register` subcommand: adds this server to an MCP client's config.
//!
//! ```text
//! rest-api-mcp register project [directory] [-- args...]   # <directory>/.mcp.json
//! rest-api-mcp register user [-- args...]                  # ~/.claude.json
//! ```

mod error;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;
use serde_json::{Map, Value};

pub use error::RegisterError;

/// Key under which the server is registered.
pub const SERVER_NAME: &str = "rest-api";

/// Which configuration file to update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// `.mcp.json` in a project directory.
    Project,
    /// `.claude.json` in the home directory.
    User,
}

impl FromStr for Scope {
    type Err = RegisterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "project" => Ok(Self::Project),
            "user" => Ok(Self::User),
            other => Err(RegisterError::UnknownScope(other.to_string())),
        }
    }
}

/// Parsed `register` arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub scope: Scope,
    /// Project directory. Always `.` for the user scope.
    pub directory: PathBuf,
    /// Arguments the client passes to the server on launch.
    pub server_args: Vec<String>,
}

/// The entry written under `mcpServers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerEntry {
    pub command: String,
    pub args: Vec<String>,
}

/// Parse everything after `register`.
pub fn parse_args<S: AsRef<str>>(args: &[S]) -> Result<Registration, RegisterError> {
    let args: Vec<String> = args.iter().map(|a| a.as_ref().to_string()).collect();
    let (scope, rest) = args.split_first().ok_or(RegisterError::MissingScope)?;
    let scope: Scope = scope.parse()?;

    let (directory, server_args) = match scope {
        Scope::Project => parse_project_args(rest),
        Scope::User => (PathBuf::from("."), parse_user_args(rest)),
    };

    Ok(Registration {
        scope,
        directory,
        server_args,
    })
}

/// `[directory] [-- args...]`
pub fn parse_project_args(args: &[String]) -> (PathBuf, Vec<String>) {
    match args.iter().position(|a| a == "--") {
        None => {
            let directory = args.first().map(String::as_str).unwrap_or(".");
            (PathBuf::from(directory), Vec::new())
        }
        Some(dash) => {
            let directory = if dash > 0 { args[0].as_str() } else { "." };
            (PathBuf::from(directory), args[dash + 1..].to_vec())
        }
    }
}

/// `[-- args...]`
pub fn parse_user_args(args: &[String]) -> Vec<String> {
    match args.iter().position(|a| a == "--") {
        Some(dash) => args[dash + 1..].to_vec(),
        None => Vec::new(),
    }
}

/// Server name from a binary path: file name without `.exe` and `-mcp`.
pub fn derive_server_name(binary_path: &str) -> String {
    let name = binary_path.rsplit(['/', '\\']).next().unwrap_or(binary_path);
    let name = name.strip_suffix(".exe").unwrap_or(name);
    let name = name.strip_suffix("-mcp").unwrap_or(name);
    name.to_string()
}

/// Resolved path of the running executable.
pub fn detect_binary_path() -> Result<PathBuf, RegisterError> {
    let exe = std::env::current_exe().map_err(RegisterError::BinaryPath)?;
    fs::canonicalize(&exe).map_err(RegisterError::BinaryPath)
}

/// Config file for a scope.
pub fn resolve_config_path(scope: Scope, directory: &Path) -> Result<PathBuf, RegisterError> {
    match scope {
        Scope::User => dirs::home_dir()
            .map(|home| home.join(".claude.json"))
            .ok_or(RegisterError::NoHomeDir),
        Scope::Project => {
            let directory = if directory.is_absolute() {
                directory.to_path_buf()
            } else {
                std::env::current_dir()
                    .map_err(RegisterError::CurrentDir)?
                    .join(directory)
            };
            Ok(directory.join(".mcp.json"))
        }
    }
}

pub fn build_entry(binary_path: &Path, server_args: &[String]) -> ServerEntry {
    ServerEntry {
        command: binary_path.to_string_lossy().into_owned(),
        args: server_args.to_vec(),
    }
}

/// Insert or replace `mcpServers.<name>` in the file at `path`, keeping
/// every other key. The file is replaced atomically.
pub fn write_config(path: &Path, name: &str, entry: &ServerEntry) -> Result<(), RegisterError> {
    let mut config = match fs::read_to_string(path) {
        Ok(text) => match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => map,
            Ok(_) => return Err(RegisterError::NotAnObject { path: path.to_path_buf() }),
            Err(source) => {
                return Err(RegisterError::Parse {
                    path: path.to_path_buf(),
                    source,
                })
            }
        },
        Err(e) if e.kind() == io::ErrorKind::NotFound => Map::new(),
        Err(source) => {
            return Err(RegisterError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let mut servers = match config.remove("mcpServers") {
        Some(Value::Object(servers)) => servers,
        _ => Map::new(),
    };
    let entry = serde_json::to_value(entry).map_err(|source| RegisterError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    servers.insert(name.to_string(), entry);
    config.insert("mcpServers".to_string(), Value::Object(servers));

    let mut output = serde_json::to_vec_pretty(&Value::Object(config)).map_err(|source| RegisterError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    output.push(b'\n');

    write_atomic(path, &output).map_err(|source| RegisterError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = tempfile::Builder::new()
        .prefix(".mcp-register-")
        .suffix(".tmp")
        .tempfile_in(parent)?;
    temp.write_all(contents)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Register `name` (derived from the binary when empty) for the given
/// arguments. Returns the name used and the config file written.
pub fn run<S: AsRef<str>>(name: &str, args: &[S]) -> Result<(String, PathBuf), RegisterError> {
    let registration = parse_args(args)?;
    let binary = detect_binary_path()?;
    let config_path = resolve_config_path(registration.scope, &registration.directory)?;

    let name = if name.is_empty() {
        derive_server_name(&binary.to_string_lossy())
    } else {
        name.to_string()
    };

    let entry = build_entry(&binary, &registration.server_args);
    write_config(&config_path, &name, &entry)?;
    tracing::info!(name = %name, path = %config_path.display(), "registered server");

    Ok((name, config_path))
}

/// Usage text for the `register` subcommand.
pub fn usage(bin: &str) -> String {
    format!(
        "Usage:\n  \
         {bin} register project [directory]                           # -> <directory>/.mcp.json\n  \
         {bin} register user                                          # -> ~/.claude.json\n  \
         {bin} register project . -- --base-url http://localhost:8080  # with forwarded args\n"
    )
}
