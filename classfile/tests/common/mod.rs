#![allow(dead_code)]

//! Builds class files in memory.

#[derive(Clone, Debug)]
pub struct Pool {
    bytes: Vec<u8>,
    next: u16,
}

impl Default for Pool {
    fn default() -> Self {
        Pool {
            bytes: Vec::new(),
            next: 1,
        }
    }
}

impl Pool {
    /// Appends an entry and returns its index.
    pub fn raw(&mut self, tag: u8, content: &[u8]) -> u16 {
        let index = self.next;
        self.bytes.push(tag);
        self.bytes.extend_from_slice(content);
        self.next += if tag == 5 || tag == 6 { 2 } else { 1 };
        index
    }

    pub fn utf8(&mut self, text: &str) -> u16 {
        let mut content = (text.len() as u16).to_be_bytes().to_vec();
        content.extend_from_slice(text.as_bytes());
        self.raw(1, &content)
    }

    pub fn class(&mut self, name: &str) -> u16 {
        let name = self.utf8(name);
        self.raw(7, &name.to_be_bytes())
    }

    pub fn string(&mut self, text: &str) -> u16 {
        let text = self.utf8(text);
        self.raw(8, &text.to_be_bytes())
    }

    pub fn long(&mut self, value: i64) -> u16 {
        self.raw(5, &value.to_be_bytes())
    }

    pub fn double(&mut self, value: f64) -> u16 {
        self.raw(6, &value.to_bits().to_be_bytes())
    }

    /// The on-disk count, one more than the number of slots.
    pub fn count(&self) -> u16 {
        self.next
    }

    pub fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.count().to_be_bytes());
        out.extend_from_slice(&self.bytes);
    }
}

fn push_table(out: &mut Vec<u8>, items: &[Vec<u8>]) {
    out.extend_from_slice(&(items.len() as u16).to_be_bytes());
    for item in items {
        out.extend_from_slice(item);
    }
}

#[derive(Clone, Debug)]
pub struct ClassFile {
    pub minor: u16,
    pub major: u16,
    pub pool: Pool,
    pub access: u16,
    pub this_class: u16,
    pub super_class: u16,
    pub interfaces: Vec<u16>,
    pub fields: Vec<Vec<u8>>,
    pub methods: Vec<Vec<u8>>,
    pub attributes: Vec<Vec<u8>>,
}

impl ClassFile {
    /// A public class named `name` extending `java/lang/Object`.
    pub fn new(name: &str) -> Self {
        let mut pool = Pool::default();
        let this_class = pool.class(name);
        let super_class = pool.class("java/lang/Object");
        ClassFile {
            minor: 0,
            major: 52,
            pool,
            access: 0x0021,
            this_class,
            super_class,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            attributes: Vec::new(),
        }
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = vec![0xca, 0xfe, 0xba, 0xbe];
        out.extend_from_slice(&self.minor.to_be_bytes());
        out.extend_from_slice(&self.major.to_be_bytes());
        self.pool.write(&mut out);
        out.extend_from_slice(&self.access.to_be_bytes());
        out.extend_from_slice(&self.this_class.to_be_bytes());
        out.extend_from_slice(&self.super_class.to_be_bytes());
        out.extend_from_slice(&(self.interfaces.len() as u16).to_be_bytes());
        for interface in &self.interfaces {
            out.extend_from_slice(&interface.to_be_bytes());
        }
        push_table(&mut out, &self.fields);
        push_table(&mut out, &self.methods);
        push_table(&mut out, &self.attributes);
        out
    }

    /// Adds a field or method record with names interned into the pool.
    pub fn member(&mut self, access: u16, name: &str, descriptor: &str, attributes: &[Vec<u8>]) -> Vec<u8> {
        let name = self.pool.utf8(name);
        let descriptor = self.pool.utf8(descriptor);
        let mut out = access.to_be_bytes().to_vec();
        out.extend_from_slice(&name.to_be_bytes());
        out.extend_from_slice(&descriptor.to_be_bytes());
        push_table(&mut out, attributes);
        out
    }

    pub fn attribute(&mut self, name: &str, payload: &[u8]) -> Vec<u8> {
        let name = self.pool.utf8(name);
        let mut out = name.to_be_bytes().to_vec();
        out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        out.extend_from_slice(payload);
        out
    }

    /// A `Code` attribute. Handlers are `[start, end, handler, catch_type]`.
    pub fn code(
        &mut self,
        max_stack: u16,
        max_locals: u16,
        code: &[u8],
        handlers: &[[u16; 4]],
        attributes: &[Vec<u8>],
    ) -> Vec<u8> {
        let mut payload = max_stack.to_be_bytes().to_vec();
        payload.extend_from_slice(&max_locals.to_be_bytes());
        payload.extend_from_slice(&(code.len() as u32).to_be_bytes());
        payload.extend_from_slice(code);
        payload.extend_from_slice(&(handlers.len() as u16).to_be_bytes());
        for handler in handlers {
            for value in handler {
                payload.extend_from_slice(&value.to_be_bytes());
            }
        }
        push_table(&mut payload, attributes);
        self.attribute("Code", &payload)
    }
}
