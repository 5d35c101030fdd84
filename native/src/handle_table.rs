// Copyright (C) Microsoft Corporation. All rights reserved.

use std::collections::HashMap;

use parking_lot::RwLock;

use super::*;

/// Kind tag for objects stored in the handle table.
#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum HandleType {
    /// Generic asymmetric key container
    Key,

    /// RSA key view
    Rsa,
}

struct Entry {
    handle_type: HandleType,
    addr: usize,
}

/// Handle table
#[derive(Default)]
pub(crate) struct HandleTable {
    table: RwLock<HandleTableInner>,
}

impl HandleTable {
    pub(crate) fn alloc_handle<T>(&self, handle_type: HandleType, obj: Box<T>) -> RsagateHandle {
        let mut table = self.table.write();
        table.alloc_handle(handle_type, obj)
    }

    #[allow(unsafe_code)]
    pub(crate) fn as_ref<T>(
        &self,
        handle: RsagateHandle,
        handle_type: HandleType,
    ) -> Result<&T, GatewayError> {
        let table = self.table.read();
        table.as_ref(handle, handle_type)
    }

    #[allow(unsafe_code)]
    pub(crate) fn as_mut<T>(
        &self,
        handle: RsagateHandle,
        handle_type: HandleType,
    ) -> Result<&mut T, GatewayError> {
        let mut table = self.table.write();
        table.as_mut(handle, handle_type)
    }

    #[allow(unsafe_code)]
    pub(crate) fn free_handle<T>(
        &self,
        handle: RsagateHandle,
        handle_type: HandleType,
    ) -> Result<Box<T>, GatewayError> {
        let mut table = self.table.write();
        table.free_handle(handle, handle_type)
    }
}

#[derive(Default)]
struct HandleTableInner {
    table: HashMap<RsagateHandle, Entry>,
    id_counter: RsagateHandle,
}

impl HandleTableInner {
    fn alloc_handle<T>(&mut self, handle_type: HandleType, obj: Box<T>) -> RsagateHandle {
        while self.id_counter == RsagateHandle(0) || self.table.contains_key(&self.id_counter) {
            self.id_counter.0 = self.id_counter.0.wrapping_add(1);
        }
        let id = self.id_counter;
        let addr = Box::leak(obj) as *mut T as usize;
        self.table.insert(id, Entry { handle_type, addr });
        id
    }

    fn addr(&self, handle: RsagateHandle, handle_type: HandleType) -> Result<usize, GatewayError> {
        self.table
            .get(&handle)
            .filter(|entry| entry.handle_type == handle_type)
            .map(|entry| entry.addr)
            .ok_or(GatewayError::InvalidHandle)
    }

    #[allow(unsafe_code)]
    fn as_ref<'a, T>(
        &self,
        handle: RsagateHandle,
        handle_type: HandleType,
    ) -> Result<&'a T, GatewayError> {
        self.addr(handle, handle_type)
            // SAFETY: the entry was created from a leaked Box<T> of the same
            // handle type and stays alive until freed through this table.
            .map(|addr| unsafe { &*(addr as *const T) })
    }

    #[allow(unsafe_code)]
    fn as_mut<'a, T>(
        &mut self,
        handle: RsagateHandle,
        handle_type: HandleType,
    ) -> Result<&'a mut T, GatewayError> {
        self.addr(handle, handle_type)
            // SAFETY: the entry was created from a leaked Box<T> of the same
            // handle type and stays alive until freed through this table.
            .map(|addr| unsafe { &mut *(addr as *mut T) })
    }

    #[allow(unsafe_code)]
    fn free_handle<T>(
        &mut self,
        handle: RsagateHandle,
        handle_type: HandleType,
    ) -> Result<Box<T>, GatewayError> {
        match self.table.remove(&handle) {
            Some(entry) if entry.handle_type == handle_type => {
                // SAFETY: the entry has been removed from the table, so we
                // own the pointer again.
                Ok(unsafe { Box::from_raw(entry.addr as *mut T) })
            }
            _ => Err(GatewayError::InvalidHandle),
        }
    }
}
