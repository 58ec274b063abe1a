/*
 * headers.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * This file is part of Missiva, an SMS/MMS messaging core.
 *
 * Missiva is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Missiva is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Missiva.  If not, see <http://www.gnu.org/licenses/>.
 */

//! MMS header field assignments (OMA-MMS-ENC section 7.4) and their token values.

// Header field names (short-integer form, high bit set).
pub const BCC: u8 = 0x81;
pub const CC: u8 = 0x82;
pub const CONTENT_LOCATION: u8 = 0x83;
pub const CONTENT_TYPE: u8 = 0x84;
pub const DATE: u8 = 0x85;
pub const DELIVERY_REPORT: u8 = 0x86;
pub const DELIVERY_TIME: u8 = 0x87;
pub const EXPIRY: u8 = 0x88;
pub const FROM: u8 = 0x89;
pub const MESSAGE_CLASS: u8 = 0x8A;
pub const MESSAGE_ID: u8 = 0x8B;
pub const MESSAGE_TYPE: u8 = 0x8C;
pub const MMS_VERSION: u8 = 0x8D;
pub const MESSAGE_SIZE: u8 = 0x8E;
pub const PRIORITY: u8 = 0x8F;
pub const READ_REPORT: u8 = 0x90;
pub const REPORT_ALLOWED: u8 = 0x91;
pub const RESPONSE_STATUS: u8 = 0x92;
pub const RESPONSE_TEXT: u8 = 0x93;
pub const SENDER_VISIBILITY: u8 = 0x94;
pub const STATUS: u8 = 0x95;
pub const SUBJECT: u8 = 0x96;
pub const TO: u8 = 0x97;
pub const TRANSACTION_ID: u8 = 0x98;
pub const RETRIEVE_STATUS: u8 = 0x99;
pub const RETRIEVE_TEXT: u8 = 0x9A;

/// MMS version 1.2 as a short-integer value (major 1 in the high nibble, minor 2).
pub const MMS_VERSION_1_2: u8 = 0x12;

pub const VALUE_YES: u8 = 0x80;
pub const VALUE_NO: u8 = 0x81;

pub const FROM_ADDRESS_PRESENT: u8 = 0x80;
pub const FROM_INSERT_ADDRESS: u8 = 0x81;

pub const TIME_ABSOLUTE: u8 = 0x80;
pub const TIME_RELATIVE: u8 = 0x81;

pub const CLASS_PERSONAL: u8 = 0x80;
pub const CLASS_ADVERTISEMENT: u8 = 0x81;
pub const CLASS_INFORMATIONAL: u8 = 0x82;
pub const CLASS_AUTO: u8 = 0x83;

pub const PRIORITY_LOW: u8 = 0x80;
pub const PRIORITY_NORMAL: u8 = 0x81;
pub const PRIORITY_HIGH: u8 = 0x82;

// Response-status values (send-conf).
pub const RESPONSE_STATUS_OK: u8 = 0x80;
pub const RESPONSE_STATUS_ERROR_UNSPECIFIED: u8 = 0x81;
pub const RESPONSE_STATUS_ERROR_SERVICE_DENIED: u8 = 0x82;
pub const RESPONSE_STATUS_ERROR_MESSAGE_FORMAT_CORRUPT: u8 = 0x83;
pub const RESPONSE_STATUS_ERROR_SENDING_ADDRESS_UNRESOLVED: u8 = 0x84;
pub const RESPONSE_STATUS_ERROR_MESSAGE_NOT_FOUND: u8 = 0x85;
pub const RESPONSE_STATUS_ERROR_NETWORK_PROBLEM: u8 = 0x86;
pub const RESPONSE_STATUS_ERROR_CONTENT_NOT_ACCEPTED: u8 = 0x87;
pub const RESPONSE_STATUS_ERROR_UNSUPPORTED_MESSAGE: u8 = 0x88;
pub const RESPONSE_STATUS_ERROR_TRANSIENT_FAILURE: u8 = 0xC0;
pub const RESPONSE_STATUS_ERROR_TRANSIENT_SENDING_ADDRESS_UNRESOLVED: u8 = 0xC1;
pub const RESPONSE_STATUS_ERROR_TRANSIENT_MESSAGE_NOT_FOUND: u8 = 0xC2;
pub const RESPONSE_STATUS_ERROR_TRANSIENT_NETWORK_PROBLEM: u8 = 0xC3;
pub const RESPONSE_STATUS_ERROR_TRANSIENT_PARTIAL_SUCCESS: u8 = 0xC4;
pub const RESPONSE_STATUS_ERROR_PERMANENT_FAILURE: u8 = 0xE0;
pub const RESPONSE_STATUS_ERROR_PERMANENT_SERVICE_DENIED: u8 = 0xE1;
pub const RESPONSE_STATUS_ERROR_PERMANENT_MESSAGE_FORMAT_CORRUPT: u8 = 0xE2;
pub const RESPONSE_STATUS_ERROR_PERMANENT_SENDING_ADDRESS_UNRESOLVED: u8 = 0xE3;
pub const RESPONSE_STATUS_ERROR_PERMANENT_MESSAGE_NOT_FOUND: u8 = 0xE4;
pub const RESPONSE_STATUS_ERROR_PERMANENT_CONTENT_NOT_ACCEPTED: u8 = 0xE5;
pub const RESPONSE_STATUS_ERROR_PERMANENT_REPLY_CHARGING_LIMITATIONS_NOT_MET: u8 = 0xE6;
pub const RESPONSE_STATUS_ERROR_PERMANENT_REPLY_CHARGING_REQUEST_NOT_ACCEPTED: u8 = 0xE7;
pub const RESPONSE_STATUS_ERROR_PERMANENT_REPLY_CHARGING_FORWARDING_DENIED: u8 = 0xE8;
pub const RESPONSE_STATUS_ERROR_PERMANENT_REPLY_CHARGING_NOT_SUPPORTED: u8 = 0xE9;
pub const RESPONSE_STATUS_ERROR_PERMANENT_ADDRESS_HIDING_NOT_SUPPORTED: u8 = 0xEA;
pub const RESPONSE_STATUS_ERROR_PERMANENT_LACK_OF_PREPAID: u8 = 0xEB;
pub const RESPONSE_STATUS_ERROR_PERMANENT_END: u8 = 0xFF;

// Retrieve-status values (retrieve-conf).
pub const RETRIEVE_STATUS_OK: u8 = 0x80;
pub const RETRIEVE_STATUS_ERROR_TRANSIENT_FAILURE: u8 = 0xC0;
pub const RETRIEVE_STATUS_ERROR_TRANSIENT_MESSAGE_NOT_FOUND: u8 = 0xC1;
pub const RETRIEVE_STATUS_ERROR_TRANSIENT_NETWORK_PROBLEM: u8 = 0xC2;
pub const RETRIEVE_STATUS_ERROR_PERMANENT_FAILURE: u8 = 0xE0;
pub const RETRIEVE_STATUS_ERROR_PERMANENT_SERVICE_DENIED: u8 = 0xE1;
pub const RETRIEVE_STATUS_ERROR_PERMANENT_MESSAGE_NOT_FOUND: u8 = 0xE2;
pub const RETRIEVE_STATUS_ERROR_PERMANENT_CONTENT_UNSUPPORTED: u8 = 0xE3;

// Status values (notifyresp-ind).
pub const STATUS_EXPIRED: u8 = 0x80;
pub const STATUS_RETRIEVED: u8 = 0x81;
pub const STATUS_REJECTED: u8 = 0x82;
pub const STATUS_DEFERRED: u8 = 0x83;
pub const STATUS_UNRECOGNIZED: u8 = 0x84;
pub const STATUS_INDETERMINATE: u8 = 0x85;
pub const STATUS_FORWARDED: u8 = 0x86;
pub const STATUS_UNREACHABLE: u8 = 0x87;

// Part header fields (WAP-230 table 39) and parameters (table 38).
pub const PART_CONTENT_LOCATION: u8 = 0x8E;
pub const PART_DEP_CONTENT_DISPOSITION: u8 = 0xAE;
pub const PART_CONTENT_ID: u8 = 0xC0;
pub const PART_CONTENT_DISPOSITION: u8 = 0xC5;
pub const PART_CONTENT_TRANSFER_ENCODING: u8 = 0xC8;

pub const DISPOSITION_FORM_DATA: u8 = 0x80;
pub const DISPOSITION_ATTACHMENT: u8 = 0x81;
pub const DISPOSITION_INLINE: u8 = 0x82;

pub const P_CHARSET: u8 = 0x81;
pub const P_TYPE: u8 = 0x83;
pub const P_DEP_NAME: u8 = 0x85;
pub const P_DEP_FILENAME: u8 = 0x86;
pub const P_CT_MR_TYPE: u8 = 0x89;
pub const P_DEP_START: u8 = 0x8A;
pub const P_NAME: u8 = 0x97;
pub const P_FILENAME: u8 = 0x98;
pub const P_START: u8 = 0x99;

/// Address-type suffix appended to phone numbers in To/Cc/Bcc/From.
pub const PLMN_SUFFIX: &str = "/TYPE=PLMN";
