#[macro_export]
macro_rules! assert_cx_approx {
    ($l:expr, $r:expr) => {
        assert_cx_approx!($l, $r, 1e-9)
    };
    ($l:expr, $r:expr, $eps:expr) => {
        assert!(
            ($l - $r).norm() < $eps,
            "assertion failed: {} !~ {}",
            $l,
            $r
        )
    };
}
