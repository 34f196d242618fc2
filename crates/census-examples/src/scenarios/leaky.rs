use std::cell::RefCell;
use std::rc::{Rc, Weak};

use census::{InstanceGuard, Tracked, TypeKey};

struct TreeNode {
    name: &'static str,
    // Should have been `Weak`; the strong back-reference keeps the tree alive.
    parent: RefCell<Option<Rc<TreeNode>>>,
    children: RefCell<Vec<Rc<TreeNode>>>,
    _census: InstanceGuard<TreeNode>,
}

impl Tracked for TreeNode {
    const TYPE_KEY: TypeKey = TypeKey::from_static("demo::TreeNode");
}

impl TreeNode {
    fn new(name: &'static str) -> Rc<Self> {
        Rc::new(Self {
            name,
            parent: RefCell::new(None),
            children: RefCell::new(Vec::new()),
            _census: InstanceGuard::new(),
        })
    }
}

struct ScratchBuffer {
    bytes: Vec<u8>,
    _census: InstanceGuard<ScratchBuffer>,
}

impl Tracked for ScratchBuffer {
    const TYPE_KEY: TypeKey = TypeKey::from_static("demo::ScratchBuffer");
}

pub async fn run() -> Result<(), String> {
    let root = TreeNode::new("root");
    for name in ["left", "right"] {
        let child = TreeNode::new(name);
        *child.parent.borrow_mut() = Some(Rc::clone(&root));
        root.children.borrow_mut().push(child);
    }
    let weak_root: Weak<TreeNode> = Rc::downgrade(&root);
    println!(
        "built tree under {:?} with {} children",
        root.name,
        root.children.borrow().len()
    );
    drop(root);

    if let Some(root) = weak_root.upgrade() {
        let parent = root.children.borrow()[0]
            .parent
            .borrow()
            .as_ref()
            .map(|parent| parent.name);
        println!("{:?} outlived its last owner (first child points at {parent:?})", root.name);
    }

    let buffer: &'static mut ScratchBuffer = Box::leak(Box::new(ScratchBuffer {
        bytes: vec![0; 4096],
        _census: InstanceGuard::new(),
    }));
    println!("leaked a {} byte scratch buffer", buffer.bytes.len());

    Ok(())
}
