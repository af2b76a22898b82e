/*
 * Responsibility
 * - middleware public interface
 *   - http: server-wide layers (request id, trace)
 *   - status: /validate status counting + panic -> 500
 */
pub mod http;
pub mod status;
