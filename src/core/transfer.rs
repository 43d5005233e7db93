//! Purpose: Hand internal text across the boundary as independently owned C strings.
//! Exports: `transfer`, `release`, `borrow_str`.
//! Role: The only place boundary strings are allocated or freed.
//! Invariants: Empty text transfers as null.
//! Invariants: Null means "empty or absent"; the two are not distinguished.
//! Invariants: Every non-null pointer from `transfer` is released exactly once via `release`.
//! Invariants: Allocation uses `try_reserve_exact`, so exhaustion surfaces as `OutOfMemory`.
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::core::error::{Error, ErrorKind};

pub fn transfer(text: &str) -> Result<*mut c_char, Error> {
    if text.is_empty() {
        return Ok(ptr::null_mut());
    }
    if text.as_bytes().contains(&0) {
        return Err(
            Error::new(ErrorKind::UnknownFailure).with_message("text contains an interior nul byte")
        );
    }

    let mut bytes = Vec::new();
    bytes.try_reserve_exact(text.len() + 1)?;
    bytes.extend_from_slice(text.as_bytes());
    bytes.push(0);

    let owned = CString::from_vec_with_nul(bytes).map_err(|err| {
        Error::new(ErrorKind::UnknownFailure)
            .with_message("failed to terminate transferred text")
            .with_source(err)
    })?;
    Ok(owned.into_raw())
}

/// Frees a buffer produced by [`transfer`]. Null is a no-op.
///
/// # Safety
/// `text` must be null or a pointer returned by [`transfer`] that has not been released yet.
pub unsafe fn release(text: *mut c_char) {
    if text.is_null() {
        return;
    }
    unsafe {
        drop(CString::from_raw(text));
    }
}

/// Views a transferred buffer as `&str`; `None` for null or non UTF-8 data.
///
/// # Safety
/// `text` must be null or point to a live NUL-terminated buffer that outlives `'a`.
pub unsafe fn borrow_str<'a>(text: *const c_char) -> Option<&'a str> {
    if text.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(text) }.to_str().ok()
}
