//! Variable memory for the calculator interpreter
//!
//! Memory is an ordered list of [`Cell`]s, one per variable name, kept in
//! first-binding order. Each cell carries a *used* flag that is cleared on
//! every (re)binding and set whenever the variable is read, which drives the
//! unused-variable diagnostic printed after a successful run.
//!
//! # Ownership
//!
//! The mutating operations take `self` by value and hand the updated memory
//! back, so the interpreter threads one `Memory` value from step to step and
//! a failed branch returns exactly the memory it produced.

use serde::Serialize;

/// One variable: name, value and whether it was read since its last binding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub name: String,
    pub value: i64,
    pub used: bool,
}

/// Ordered variable bindings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Memory {
    cells: Vec<Cell>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to `value`. An existing cell is overwritten in place, so
    /// declaration order is kept; the used flag is reset either way.
    pub fn bind(mut self, name: &str, value: i64) -> Self {
        match self.cells.iter_mut().find(|c| c.name == name) {
            Some(cell) => {
                cell.value = value;
                cell.used = false;
            }
            None => self.cells.push(Cell {
                name: name.to_string(),
                value,
                used: false,
            }),
        }
        self
    }

    /// Reads `name`, marking it used. `None` if it was never bound.
    pub fn lookup(mut self, name: &str) -> (Option<i64>, Self) {
        let value = self.cells.iter_mut().find(|c| c.name == name).map(|cell| {
            cell.used = true;
            cell.value
        });
        (value, self)
    }

    /// Reads `name` without touching its used flag.
    pub fn get(&self, name: &str) -> Option<i64> {
        self.cells.iter().find(|c| c.name == name).map(|c| c.value)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Names never read since their last binding, in declaration order.
    pub fn unused(&self) -> Vec<&str> {
        self.cells
            .iter()
            .filter(|c| !c.used)
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Rough heap footprint, for snapshot accounting.
    pub fn estimated_size(&self) -> usize {
        self.cells
            .iter()
            .map(|c| std::mem::size_of::<Cell>() + c.name.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_and_lookup() {
        let memory = Memory::new().bind("a", 3).bind("b", 4);
        assert_eq!(memory.unused(), vec!["a", "b"]);

        let (value, memory) = memory.lookup("a");
        assert_eq!(value, Some(3));
        assert_eq!(memory.unused(), vec!["b"]);

        let (missing, memory) = memory.lookup("c");
        assert_eq!(missing, None);
        assert_eq!(memory.len(), 2);
    }

    #[test]
    fn test_rebind_keeps_order_and_resets_used() {
        let (_, memory) = Memory::new().bind("x", 1).bind("y", 2).lookup("x");
        assert!(memory.cells()[0].used);

        let memory = memory.bind("x", 10);
        let names: Vec<&str> = memory.cells().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["x", "y"]);
        assert_eq!(memory.get("x"), Some(10));
        assert!(!memory.cells()[0].used);
    }

    #[test]
    fn test_get_does_not_mark_used() {
        let memory = Memory::new().bind("n", 5);
        assert_eq!(memory.get("n"), Some(5));
        assert_eq!(memory.unused(), vec!["n"]);
    }
}
