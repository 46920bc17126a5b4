use anyhow::{Result, bail};
use std::{fmt::Debug, ops::RangeBounds};

pub fn check_num<T, R>(num: T, range: R) -> Result<()>
where
    T: PartialOrd + Debug,
    R: RangeBounds<T> + Debug,
{
    if !range.contains(&num) {
        bail!("number must be in the range {range:?}, but is {num:?}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_num_bounds() {
        assert!(check_num(0.0, 0.0..=1.0).is_ok());
        assert!(check_num(1.0, 0.0..=1.0).is_ok());
        assert!(check_num(1.0, 0.0..1.0).is_err());
        assert!(check_num(0, 1..100).is_err());
    }
}
