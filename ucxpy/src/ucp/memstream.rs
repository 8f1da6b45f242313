//! Capture what a UCX `*_print*` function writes to a `FILE *`.
use std::io;
use std::os::raw::c_char;
use std::ptr;
use std::slice;
use nix::libc;
use crate::Result;

/// Run `f` with a `FILE *` backed by memory and return everything it
/// wrote.
pub(crate) fn capture<F>(f: F) -> Result<String>
where
    F: FnOnce(*mut libc::FILE),
{
    let mut buf: *mut c_char = ptr::null_mut();
    let mut size: libc::size_t = 0;
    let stream = unsafe { libc::open_memstream(&mut buf, &mut size) };
    if stream.is_null() {
        return Err(io::Error::last_os_error().into());
    }
    f(stream);
    // buf and size are only valid once the stream is closed
    let closed = unsafe { libc::fclose(stream) };
    let text = if buf.is_null() {
        String::new()
    } else {
        let bytes = unsafe { slice::from_raw_parts(buf as *const u8, size) };
        let text = String::from_utf8_lossy(bytes).into_owned();
        unsafe { libc::free(buf as *mut libc::c_void) };
        text
    };
    if closed != 0 {
        return Err(io::Error::last_os_error().into());
    }
    Ok(text)
}
