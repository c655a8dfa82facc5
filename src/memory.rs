//! # Memory
//!
//! Memory management for the heap-object layer.
//!
//! The reference implementation routes every allocation, growth, and free
//! through one `reallocate` primitive. In this port that primitive is
//! simply `Vec`/`Box`'s own allocator (there is nothing to hand-roll: the
//! standard allocator already aborts the process on allocation failure,
//! matching §5 of the spec). What *is* hand-rolled, because the reference
//! implementation hand-rolls it too, is the bulk teardown of the VM's
//! intrusive object list: every [`Obj`] is threaded onto a singly-linked
//! list via [`Obj::next`], and `free_objects` walks it exactly once,
//! releasing each node.

use crate::object::{Obj, ObjString, ObjType};
use std::ptr::NonNull;

/// Walk the VM's object list, freeing every node. Called once, from
/// [`crate::vm::VM::free`] (and from `Drop for VM`).
///
/// # Safety
///
/// `head` must be the head of a well-formed list of objects each
/// allocated via `Box::into_raw` (i.e. boxed), with no aliasing
/// references into the list still live elsewhere.
pub(crate) unsafe fn free_objects(mut head: Option<NonNull<Obj>>) {
  while let Some(obj) = head {
    head = obj.as_ref().next;
    free_object(obj);
  }
}

/// Free a single heap object, reconstructing the `Box` of its concrete
/// subtype so the subtype's payload is dropped correctly.
unsafe fn free_object(obj: NonNull<Obj>) {
  match obj.as_ref().obj_type {
    ObjType::String => {
      drop(Box::from_raw(obj.cast::<ObjString>().as_ptr()));
    }
  }
}
