use anyhow::{Context, Result};
use bumpalo::Bump;
use std::{env, fs::File, io, io::Read, process};

use rust_linkedlist::allocator::{Bounded, Global, NodeAllocator};
use rust_linkedlist::linkedlist::LinkedList;
use rust_linkedlist::script::Script;

/*
 * Run <script> against a list backed by <alloc>, then dump the state
 * of the list after every step.
 */
fn execute<A: NodeAllocator>(script: &Script, alloc: A) -> Result<()> {
    let bump = Bump::new();
    let mut list = LinkedList::with_allocator(alloc);
    let stdout = io::stdout();
    let trace = script
        .run(&mut list, &bump, &mut stdout.lock())
        .context("Script aborted")?;

    println!("Trace :");
    for entry in trace {
        println!("{:>4} : {:?}", entry.line, entry.state);
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init_from_env(env_logger::Env::new().filter_or("LINKEDLIST_LOG", "warn"));

    let argc = env::args().len();
    if !(2..=3).contains(&argc) {
        println!(
            "Usage : {} [script file] [node limit]",
            env::args().next().unwrap_or_else(|| "rust-linkedlist".into())
        );
        process::exit(1);
    }
    let mut args = env::args().skip(1);

    let path = args.next().context("Missing script file")?;
    let mut f = File::open(&path).context("Failed to open file")?;
    let mut input = String::new();
    f.read_to_string(&mut input)
        .context("Failed to read file")?;
    let script = Script::parse(&input).context("Failed to parse script")?;

    let limit = args.next().map(|arg| parse_limit(&arg)).transpose()?;
    execute_with_limit(&script, limit)
}

fn parse_limit(arg: &str) -> Result<usize> {
    arg.parse().with_context(|| format!("Invalid node limit `{}`", arg))
}

/*
 * A node limit bounds the list, otherwise nodes come straight from the heap
 */
fn execute_with_limit(script: &Script, limit: Option<usize>) -> Result<()> {
    match limit {
        Some(limit) => execute(script, Bounded::new(limit)),
        None => execute(script, Global),
    }
}
