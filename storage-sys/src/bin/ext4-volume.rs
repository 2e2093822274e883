// SPDX-License-Identifier: GPL-3.0-only

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use storage_sys::{Ext4, SysError, resolve_tools_from_path};
use storage_types::{FormatRequest, MountRequest, ToolPaths};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug, Parser)]
#[command(name = "ext4-volume")]
#[command(about = "Mount, check, and format ext4 volumes")]
struct Args {
    /// TOML file with `checker`, `generic_formatter`, `specialized_formatter`
    #[arg(long, global = true, conflicts_with = "helper_prefix")]
    config: Option<PathBuf>,

    /// Directory holding e2fsck, mke2fs and make_ext4fs
    #[arg(long, global = true)]
    helper_prefix: Option<PathBuf>,

    /// Prefer helpers found on PATH
    #[arg(long, global = true)]
    search_path: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Mount an ext4 volume
    Mount {
        source: PathBuf,
        target: PathBuf,

        #[arg(long)]
        read_only: bool,

        #[arg(long)]
        remount: bool,

        /// Allow executing binaries from the volume
        #[arg(long)]
        executable: bool,

        /// Label the mount as external storage
        #[arg(long)]
        force_context: bool,

        /// Extra comma separated mount options
        #[arg(long)]
        options: Option<String>,
    },

    /// Run e2fsck in preen mode
    Check { device: PathBuf },

    /// Create an ext4 filesystem
    Format {
        device: PathBuf,

        /// Format with make_ext4fs for this mount point
        #[arg(long)]
        mount_point: Option<PathBuf>,
    },
}

fn load_tools(args: &Args) -> Result<ToolPaths> {
    let tools = match (&args.config, &args.helper_prefix) {
        (Some(path), _) => ToolPaths::from_toml_file(path)?,
        (None, Some(prefix)) => ToolPaths::with_prefix(prefix),
        (None, None) => ToolPaths::default(),
    };

    Ok(if args.search_path {
        resolve_tools_from_path(tools)
    } else {
        tools
    })
}

/// Process exit status for a failed operation: its errno, or 1 if that does
/// not fit in a byte
fn exit_status(error: &SysError) -> u8 {
    u8::try_from(error.errno() as i32).unwrap_or(1)
}

fn main() -> ExitCode {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("storage_sys=info,ext4_volume=info,warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let tools = match load_tools(&args) {
        Ok(tools) => tools,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::FAILURE;
        }
    };
    if unsafe { libc::geteuid() } != 0 {
        tracing::warn!("Not running as root; mount and format will likely be refused");
    }

    let ext4 = Ext4::new(tools);
    tracing::debug!("Using helpers {:?}", ext4.tools());

    let result = match args.command {
        Command::Mount {
            source,
            target,
            read_only,
            remount,
            executable,
            force_context,
            options,
        } => {
            let mut request = MountRequest::new(source, target)
                .read_only(read_only)
                .remount(remount)
                .executable(executable)
                .force_context(force_context);
            request.options = options;
            ext4.mount(&request)
        }
        Command::Check { device } => ext4.check(&device),
        Command::Format {
            device,
            mount_point,
        } => {
            let mut request = FormatRequest::new(device);
            request.mount_point = mount_point;
            ext4.format(&request)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::from(exit_status(&e))
        }
    }
}
