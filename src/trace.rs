use crate::{cache::CacheSim, error::SimError, mem::Matrix};

/// Replays the access trace of a naive `C += A * B` against the cache: for
/// each output element in row-major order, one touch of `C[i,j]`, then
/// `A[i,k]`, `B[k,j]`, `C[i,j]` per inner step. Hit ratios are
/// order-sensitive, so the walk is fixed: n^2 * (3n + 1) requests total.
pub fn run_matmul(
    cache: &mut dyn CacheSim,
    n: usize,
    a: &Matrix,
    b: &Matrix,
    c: &Matrix,
    heartbeat: u64,
) -> Result<(), SimError> {
    let mut issued: u64 = 0;
    let mut next_heartbeat = heartbeat;

    for i in 0..n {
        for j in 0..n {
            cache.get(c.addr(i * n + j))?;
            for k in 0..n {
                cache.get(a.addr(i * n + k))?;
                cache.get(b.addr(k * n + j))?;
                cache.get(c.addr(i * n + j))?;
            }

            issued += 3 * n as u64 + 1;
            if heartbeat != 0 && issued > next_heartbeat {
                println!("Requests: {issued}");
                while next_heartbeat < issued {
                    next_heartbeat += heartbeat;
                }
            }
        }
    }
    Ok(())
}
