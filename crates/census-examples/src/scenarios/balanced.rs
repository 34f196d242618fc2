use census::{InstanceGuard, Tracked, TypeKey};

#[derive(Clone)]
struct Connection {
    peer: String,
    _census: InstanceGuard<Connection>,
}

impl Tracked for Connection {
    const TYPE_KEY: TypeKey = TypeKey::from_static("demo::Connection");
}

impl Connection {
    fn open(peer: impl Into<String>) -> Self {
        Self {
            peer: peer.into(),
            _census: InstanceGuard::new(),
        }
    }
}

struct Pool {
    idle: Vec<Connection>,
    _census: InstanceGuard<Pool>,
}

impl Tracked for Pool {
    const TYPE_KEY: TypeKey = TypeKey::from_static("demo::Pool");
}

pub async fn run() -> Result<(), String> {
    let mut pool = Pool {
        idle: Vec::new(),
        _census: InstanceGuard::new(),
    };
    for port in 9000..9004 {
        pool.idle.push(Connection::open(format!("127.0.0.1:{port}")));
    }

    let checked_out = pool.idle.pop().ok_or("pool should not be empty")?;
    let mirror = checked_out.clone();
    println!(
        "checked out {} (mirrored to {}), {} idle",
        checked_out.peer,
        mirror.peer,
        pool.idle.len()
    );
    println!(
        "live connections: {}",
        census::instance_count(&Connection::TYPE_KEY)
    );

    pool.idle.push(checked_out);
    drop(mirror);
    drop(pool);

    println!(
        "after shutdown, live connections: {}",
        census::instance_count(&Connection::TYPE_KEY)
    );
    Ok(())
}
