// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::ffi::OsStr;
use std::path::PathBuf;
use std::process::Command as StdCommand;
use std::process::ExitCode;

use clap::Parser;
use clap::Subcommand;

#[derive(Parser)]
struct Command {
    #[command(subcommand)]
    sub: SubCommand,
}

impl Command {
    fn run(self) -> Result<(), String> {
        match self.sub {
            SubCommand::Build(cmd) => cmd.run(),
            SubCommand::Lint(cmd) => cmd.run(),
            SubCommand::Test(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum SubCommand {
    #[command(about = "Compile workspace packages.")]
    Build(CommandBuild),
    #[command(about = "Run format and clippy checks.")]
    Lint(CommandLint),
    #[command(about = "Run unit tests.")]
    Test(CommandTest),
}

#[derive(Parser)]
struct CommandBuild {
    #[arg(long, help = "Assert that `Cargo.lock` will remain unchanged.")]
    locked: bool,
}

impl CommandBuild {
    fn run(self) -> Result<(), String> {
        let mut args = vec!["build", "--workspace", "--all-features", "--tests", "--bins"];
        if self.locked {
            args.push("--locked");
        }
        run_command(make_build_cmd("cargo", &args)?)
    }
}

#[derive(Parser)]
struct CommandTest {
    #[arg(long, help = "Run tests serially and do not capture output.")]
    no_capture: bool,
}

impl CommandTest {
    fn run(self) -> Result<(), String> {
        let mut args = vec!["test", "--workspace", "--all-features"];
        if self.no_capture {
            args.extend(["--", "--nocapture", "--test-threads=1"]);
        }
        run_command(make_build_cmd("cargo", &args)?)
    }
}

#[derive(Parser)]
#[command(name = "lint")]
struct CommandLint {
    #[arg(long, help = "Automatically apply lint suggestions.")]
    fix: bool,
}

impl CommandLint {
    fn run(self) -> Result<(), String> {
        run_command(make_clippy_cmd(self.fix)?)?;
        run_command(make_format_cmd(self.fix)?)
    }
}

fn find_command(cmd: &str) -> Result<PathBuf, String> {
    which::which(cmd).map_err(|err| format!("{cmd} not found: {err}"))
}

fn make_build_cmd<I, S>(cmd: &str, args: I) -> Result<StdCommand, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = StdCommand::new(find_command(cmd)?);
    command.args(args);
    Ok(command)
}

fn make_clippy_cmd(fix: bool) -> Result<StdCommand, String> {
    let mut args = vec!["clippy", "--tests", "--all-features", "--all-targets"];
    if fix {
        args.extend(["--allow-staged", "--allow-dirty", "--fix"]);
    }
    args.extend(["--", "-D", "warnings"]);
    make_build_cmd("cargo", &args)
}

fn make_format_cmd(fix: bool) -> Result<StdCommand, String> {
    let mut args = vec!["fmt", "--all"];
    if !fix {
        args.push("--check");
    }
    make_build_cmd("cargo", &args)
}

fn run_command(mut cmd: StdCommand) -> Result<(), String> {
    println!("$ {cmd:?}");
    let status = cmd
        .status()
        .map_err(|err| format!("failed to execute {cmd:?}: {err}"))?;
    if status.success() {
        Ok(())
    } else {
        Err(format!("command {cmd:?} exited with {status}"))
    }
}

fn main() -> ExitCode {
    match Command::parse().run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
