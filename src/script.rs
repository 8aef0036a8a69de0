use anyhow::{anyhow, Context, Result};
use bumpalo::Bump;
use log::{debug, info, warn};
use regex::Regex;
use std::io::Write;

use crate::allocator::NodeAllocator;
use crate::linkedlist::LinkedList;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    PushFront(i64),
    PushBack(i64),
    Delete(i64),
    Find(i64),
    Print,
    Destroy,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Step<'a> {
    pub line: usize,
    pub source: &'a str,
    pub op: Op,
}

/*
 * State of the list right after the step on <line>.
 * The slice lives in the arena passed to Script::run.
 */
#[derive(Debug)]
pub struct TraceEntry<'b> {
    pub line: usize,
    pub state: &'b [i64],
}

pub struct Script<'a> {
    pub steps: Vec<Step<'a>>,
}

impl<'a> Script<'a> {
    /*
     * Parse a script from input.
     * One command per line, blank lines and lines starting with # are skipped :
     * push_front <n> | push_back <n> | delete <n> | find <n> | print | destroy
     */
    pub fn parse(input: &'a str) -> Result<Self> {
        let re = Regex::new(r"^([a-z_]+)(?:\s+(-?\d+))?$")?;
        let mut steps = vec![];

        for (idx, l) in input.lines().enumerate() {
            let line = idx + 1;
            let source = l.trim();
            if source.is_empty() || source.starts_with('#') {
                continue;
            }

            let captures = re
                .captures(source)
                .ok_or(anyhow!("Failed to parse line {}: `{}`", line, source))?;
            let command = &captures[1];
            let operand = match captures.get(2) {
                Some(m) => Some(
                    m.as_str()
                        .parse::<i64>()
                        .with_context(|| format!("Bad operand on line {}", line))?,
                ),
                None => None,
            };

            let op = match (command, operand) {
                ("push_front", Some(v)) => Op::PushFront(v),
                ("push_back", Some(v)) => Op::PushBack(v),
                ("delete", Some(v)) => Op::Delete(v),
                ("find", Some(v)) => Op::Find(v),
                ("print", None) => Op::Print,
                ("destroy", None) => Op::Destroy,
                ("push_front" | "push_back" | "delete" | "find", None) => {
                    return Err(anyhow!("Missing operand on line {}: `{}`", line, source))
                }
                ("print" | "destroy", Some(_)) => {
                    return Err(anyhow!("Unexpected operand on line {}: `{}`", line, source))
                }
                _ => return Err(anyhow!("Unknown command on line {}: `{}`", line, source)),
            };
            steps.push(Step { line, source, op });
        }

        Ok(Script { steps })
    }

    /*
     * Apply every step to <list>, writing print/find results to <out>.
     * Allocation failure stops the run; the list keeps its state from
     * before the failing step.
     */
    pub fn run<'b, A: NodeAllocator, W: Write>(
        &self,
        list: &mut LinkedList<i64, A>,
        bump: &'b Bump,
        out: &mut W,
    ) -> Result<Vec<TraceEntry<'b>>> {
        let mut trace = Vec::with_capacity(self.steps.len());

        for step in &self.steps {
            debug!("line {}: {:?}", step.line, step.op);
            let inserted = match step.op {
                Op::PushFront(v) => list.push_front(v),
                Op::PushBack(v) => list.push_back(v),
                Op::Delete(v) => {
                    if !list.delete(&v) {
                        debug!("line {}: {} not in list", step.line, v);
                    }
                    Ok(())
                }
                Op::Find(v) => {
                    match list.find(&v) {
                        Some(node) => writeln!(out, "found {}", node.value())?,
                        None => writeln!(out, "{} not found", v)?,
                    }
                    Ok(())
                }
                Op::Print => {
                    writeln!(out, "{}", list)?;
                    Ok(())
                }
                Op::Destroy => {
                    list.destroy();
                    Ok(())
                }
            };
            if let Err(e) = &inserted {
                warn!("line {}: {}", step.line, e);
            }
            inserted.with_context(|| format!("line {}: `{}`", step.line, step.source))?;

            trace.push(TraceEntry {
                line: step.line,
                state: list.snapshot_in(bump),
            });
        }

        info!(
            "ran {} steps, {} values left in list",
            self.steps.len(),
            list.len()
        );
        Ok(trace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::{AllocationError, Bounded};

    #[test]
    fn parse_script() {
        let input = "# build
push_back 10
  push_front -5

print
destroy";
        let script = Script::parse(input).unwrap();
        assert_eq!(
            script.steps.iter().map(|s| s.op).collect::<Vec<_>>(),
            vec![Op::PushBack(10), Op::PushFront(-5), Op::Print, Op::Destroy]
        );
        assert_eq!(script.steps[1].line, 3);
        assert_eq!(script.steps[1].source, "push_front -5");
    }

    #[test]
    fn parse_errors_name_the_line() {
        let err = Script::parse("print\npop 3").err().unwrap();
        assert_eq!(err.to_string(), "Unknown command on line 2: `pop 3`");

        let err = Script::parse("push_back").err().unwrap();
        assert_eq!(err.to_string(), "Missing operand on line 1: `push_back`");

        let err = Script::parse("print 4").err().unwrap();
        assert_eq!(err.to_string(), "Unexpected operand on line 1: `print 4`");

        assert!(Script::parse("push_back ten").is_err());
        assert!(Script::parse("push_back 99999999999999999999").is_err());
    }

    #[test]
    fn run_reference_scenario() {
        let input = "push_back 10
push_back 20
push_back 30
push_front 5
print
delete 20
print
find 30
find 20
destroy
print";
        let script = Script::parse(input).unwrap();
        let bump = Bump::new();
        let mut list = LinkedList::new();
        let mut out = Vec::new();
        let trace = script.run(&mut list, &bump, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "5 -> 10 -> 20 -> 30 -> END
5 -> 10 -> 30 -> END
found 30
20 not found
END
"
        );
        assert_eq!(trace.len(), 11);
        assert_eq!(trace[3].state, &[5, 10, 20, 30]);
        assert_eq!(trace[5].line, 6);
        assert_eq!(trace[5].state, &[5, 10, 30]);
        assert!(trace[10].state.is_empty());
    }

    #[test]
    fn delete_on_empty_list_is_silent() {
        let script = Script::parse("delete 99\nprint").unwrap();
        let bump = Bump::new();
        let mut list = LinkedList::new();
        let mut out = Vec::new();
        script.run(&mut list, &bump, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "END\n");
    }

    #[test]
    fn allocation_failure_stops_run() {
        let script = Script::parse("push_back 1\npush_back 2\npush_back 3\nprint").unwrap();
        let bump = Bump::new();
        let mut list = LinkedList::with_allocator(Bounded::new(2));
        let mut out = Vec::new();
        let err = script.run(&mut list, &bump, &mut out).unwrap_err();

        assert_eq!(err.to_string(), "line 3: `push_back 3`");
        assert_eq!(
            err.downcast_ref::<AllocationError>(),
            Some(&AllocationError { limit: 2 })
        );
        assert_eq!(list.to_sequence(), vec![1, 2]);
        assert!(out.is_empty());
    }
}
