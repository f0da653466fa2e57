/// Checks that `$n` lies in `[$lower, $upper]`.
///
/// Evaluates to an `io::Result<()>`. The error kind defaults to `InvalidData` (for values read from
/// a bitstream). Writers pass `InvalidInput` to reject values that do not fit their field.
macro_rules! range_check {
    ($n:expr, $lower:expr, $upper:expr, $kind:ident) => {{
        let value = $n;
        if ($lower..=$upper).contains(&value) {
            ::std::result::Result::Ok(())
        } else {
            ::std::result::Result::Err(::std::io::Error::new(
                ::std::io::ErrorKind::$kind,
                format!("{} is out of range [{}, {}]: {}", stringify!($n), $lower, $upper, value),
            ))
        }
    }};
    ($n:expr, $lower:expr, $upper:expr) => {
        range_check!($n, $lower, $upper, InvalidData)
    };
}

pub(crate) use range_check;
